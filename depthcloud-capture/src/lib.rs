//! Depthcloud Capture - depth frames to an accumulated point cloud
//!
//! Each frame pairs a row-major depth buffer with a camera-to-world pose.
//! The pipeline per frame is:
//!
//! - [`DepthSampler`] walks the buffer on a fixed stride, skipping depths `<= 0`
//! - [`PointReconstructor`] maps each sample through NDC and the pose
//! - [`PointCloudStore`] merges the frame's points into the session set
//!
//! [`CaptureController`] ties these together and exports the set as PLY.
//!
//! ## Example
//!
//! ```no_run
//! use depthcloud_capture::{CaptureConfig, CaptureController, SyntheticConfig, SyntheticDepthSource, run_source};
//!
//! let controller = CaptureController::new(CaptureConfig::default())?;
//! controller.start();
//! let mut source = SyntheticDepthSource::new(SyntheticConfig::default());
//! run_source(&controller, &mut source)?;
//! controller.stop();
//! let ply = controller.export_now()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
mod controller;
mod error;
mod frame;
mod reconstruct;
mod recorded;
mod sampler;
mod source;
mod store;

pub use config::{CaptureConfig, DEFAULT_STRIDE};
pub use controller::CaptureController;
pub use error::CaptureError;
pub use frame::{DepthFrame, DepthSample, Pose};
pub use reconstruct::PointReconstructor;
pub use recorded::{RecordedDepthSource, RecordedFrame, write_frame};
pub use sampler::{DepthSampler, Samples};
pub use source::{DepthSource, SyntheticConfig, SyntheticDepthSource, run_source};
pub use store::PointCloudStore;

// Re-export the data types callers need alongside the pipeline
pub use depthcloud_data::{PlyError, Point3D, PointCloud};
