//! Error types for PLY export and import.

use thiserror::Error;

/// Errors that can occur while writing or reading PLY documents.
#[derive(Debug, Error)]
pub enum PlyError {
    /// Export was requested but there is nothing to export.
    #[error("point cloud is empty, nothing to export")]
    EmptyCloud,

    /// A coordinate is NaN or infinite and has no decimal form.
    #[error("point ({x}, {y}, {z}) has a non-finite coordinate")]
    NonFinitePoint { x: f32, y: f32, z: f32 },

    #[error("Missing '{name}' at vertex {index}")]
    MissingProperty { index: usize, name: &'static str },

    #[error("PLY parsing error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
