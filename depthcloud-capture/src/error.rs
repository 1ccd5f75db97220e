//! Errors raised at the capture boundary.

use thiserror::Error;

/// Errors that can occur while building frames or reading depth sources.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Depth buffer holds {actual} values, expected {width}x{height} = {expected}")]
    DimensionMismatch {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Depth buffer dimensions {width}x{height} overflow")]
    DimensionOverflow { width: usize, height: usize },

    #[error("Sampling stride must be at least 1")]
    InvalidStride,

    #[error("Invalid recorded frame on line {line}: {source}")]
    Recording {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode frame: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
