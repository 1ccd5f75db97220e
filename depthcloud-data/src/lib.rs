//! Depthcloud Data Crate
//!
//! Point types, deduplicated point clouds and the PLY text format.
//! This crate knows nothing about cameras or capture sessions.

pub mod cloud;
pub mod ply;
pub mod types;

pub use cloud::{CloudStats, PointCloud};
pub use ply::{PlyError, PlyExporter, SUGGESTED_FILE_NAME, load_points_from_ply, read_points};
pub use types::Point3D;
