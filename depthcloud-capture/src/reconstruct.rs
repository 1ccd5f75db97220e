//! Depth sample to world-space point conversion.

use crate::frame::{DepthFrame, DepthSample, Pose};
use depthcloud_data::Point3D;
use glam::Vec4;

/// Reconstructs world points for one frame.
///
/// Pixel coordinates are mapped to `[-1, 1)` with
/// `ndc = (p / size) * 2 - 1`, paired with the raw depth into
/// `(ndc_x, ndc_y, depth, 1)` and multiplied by the pose. The resulting
/// `x y z` are taken as-is; `w` is not divided out, which is only exact for
/// affine poses.
#[derive(Debug, Clone, Copy)]
pub struct PointReconstructor {
    width: f32,
    height: f32,
    pose: Pose,
}

impl PointReconstructor {
    pub fn new(width: usize, height: usize, pose: Pose) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
            pose,
        }
    }

    pub fn for_frame(frame: &DepthFrame) -> Self {
        Self::new(frame.width(), frame.height(), frame.pose())
    }

    /// The homogeneous vector fed into the pose for `sample`.
    pub fn ndc(&self, sample: DepthSample) -> Vec4 {
        let ndc_x = (sample.x as f32 / self.width) * 2.0 - 1.0;
        let ndc_y = (sample.y as f32 / self.height) * 2.0 - 1.0;
        Vec4::new(ndc_x, ndc_y, sample.depth, 1.0)
    }

    pub fn reconstruct(&self, sample: DepthSample) -> Point3D {
        Point3D::from(self.pose.transform(self.ndc(sample)).truncate())
    }
}
