//! Error types for the command-line application.

use depthcloud_capture::CaptureError;
use depthcloud_data::PlyError;
use thiserror::Error;

/// Errors that can end a command.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Export error: {0}")]
    Ply(#[from] PlyError),

    #[error("Frame producer thread panicked")]
    ProducerPanicked,

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
