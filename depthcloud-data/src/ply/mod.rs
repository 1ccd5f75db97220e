//! PLY encoding and decoding for point clouds

mod error;
mod loader;
mod writer;

pub use error::PlyError;
pub use loader::{load_points_from_ply, read_points};
pub use writer::{PlyExporter, SUGGESTED_FILE_NAME};
