//! Capture pipeline configuration.

use crate::error::CaptureError;
use std::num::NonZeroUsize;

/// Stride used when none is configured: every third pixel on both axes.
pub const DEFAULT_STRIDE: usize = 3;

/// Configuration for [`CaptureController`](crate::CaptureController).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureConfig {
    /// Pixel step between samples along each axis. Must be at least 1.
    pub stride: usize,
}

impl CaptureConfig {
    pub fn with_stride(stride: usize) -> Self {
        Self { stride }
    }

    /// The stride as a non-zero step, or [`CaptureError::InvalidStride`].
    pub fn validated_stride(&self) -> Result<NonZeroUsize, CaptureError> {
        NonZeroUsize::new(self.stride).ok_or(CaptureError::InvalidStride)
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            stride: DEFAULT_STRIDE,
        }
    }
}
