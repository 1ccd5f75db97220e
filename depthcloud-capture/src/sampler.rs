//! Strided scan over a depth buffer.

use crate::error::CaptureError;
use crate::frame::{DepthFrame, DepthSample, check_buffer_len};
use std::iter::FusedIterator;
use std::num::NonZeroUsize;

/// A view over a depth buffer that yields valid samples on a fixed grid.
///
/// Visits `(x, y)` for `x = 0, s, 2s, .. < width` and `y = 0, s, 2s, .. < height`
/// in row-major order. Values `<= 0`, NaN and infinities are skipped silently.
/// Each call to [`DepthSampler::samples`] starts a fresh scan.
#[derive(Debug, Clone, Copy)]
pub struct DepthSampler<'a> {
    depth: &'a [f32],
    width: usize,
    height: usize,
    stride: NonZeroUsize,
}

impl<'a> DepthSampler<'a> {
    /// Sample a raw row-major buffer.
    pub fn new(
        depth: &'a [f32],
        width: usize,
        height: usize,
        stride: NonZeroUsize,
    ) -> Result<Self, CaptureError> {
        check_buffer_len(width, height, depth.len())?;
        Ok(Self {
            depth,
            width,
            height,
            stride,
        })
    }

    /// Sample a frame whose dimensions were checked when it was built.
    pub fn for_frame(frame: &'a DepthFrame, stride: NonZeroUsize) -> Self {
        Self {
            depth: frame.depth(),
            width: frame.width(),
            height: frame.height(),
            stride,
        }
    }

    pub fn stride(&self) -> NonZeroUsize {
        self.stride
    }

    /// Number of grid positions visited, valid or not.
    pub fn grid_len(&self) -> usize {
        self.width.div_ceil(self.stride.get()) * self.height.div_ceil(self.stride.get())
    }

    pub fn samples(&self) -> Samples<'a> {
        Samples {
            sampler: *self,
            x: 0,
            y: if self.width == 0 { self.height } else { 0 },
        }
    }
}

impl<'a> IntoIterator for DepthSampler<'a> {
    type Item = DepthSample;
    type IntoIter = Samples<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples()
    }
}

/// Iterator returned by [`DepthSampler::samples`].
#[derive(Debug, Clone)]
pub struct Samples<'a> {
    sampler: DepthSampler<'a>,
    x: usize,
    y: usize,
}

impl Iterator for Samples<'_> {
    type Item = DepthSample;

    fn next(&mut self) -> Option<DepthSample> {
        let s = self.sampler;
        let stride = s.stride.get();
        while self.y < s.height {
            let (x, y) = (self.x, self.y);
            self.x += stride;
            if self.x >= s.width {
                self.x = 0;
                self.y += stride;
            }

            let depth = s.depth[y * s.width + x];
            if depth.is_finite() && depth > 0.0 {
                return Some(DepthSample { x, y, depth });
            }
        }
        None
    }
}

impl FusedIterator for Samples<'_> {}
