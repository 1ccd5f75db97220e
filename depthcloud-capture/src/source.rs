//! Depth-and-pose source trait and a synthetic implementation.

use crate::controller::CaptureController;
use crate::error::CaptureError;
use crate::frame::{DepthFrame, Pose};
use glam::Vec3;
use tracing::{debug, info};

/// Trait for upstream producers of posed depth frames.
pub trait DepthSource {
    /// Get the next frame. Returns `None` when the source is exhausted.
    fn next_frame(&mut self) -> Result<Option<DepthFrame>, CaptureError>;

    /// Get the frame rate, if known.
    fn frame_rate(&self) -> Option<f32>;

    /// Check if the source is still active.
    fn is_active(&self) -> bool;

    /// Stop producing frames.
    fn stop(&mut self);
}

/// Feed every frame of `source` into `controller` until the source ends.
///
/// Returns the number of frames delivered, including any the controller
/// dropped because it was stopped.
pub fn run_source<S: DepthSource + ?Sized>(
    controller: &CaptureController,
    source: &mut S,
) -> Result<u64, CaptureError> {
    let mut delivered = 0;
    while source.is_active() {
        let Some(frame) = source.next_frame()? else {
            break;
        };
        controller.on_frame(&frame);
        delivered += 1;
    }
    debug!("Source finished after {} frames", delivered);
    Ok(delivered)
}

/// Parameters for [`SyntheticDepthSource`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticConfig {
    pub width: usize,
    pub height: usize,
    /// Depth of the wall in front of the camera.
    pub distance: f32,
    /// Camera translation along X between consecutive frames.
    pub step: f32,
    /// Number of frames before the source ends.
    pub frames: usize,
    /// Every pixel with `(x + y) % hole_period == 0` reads as unmeasured.
    /// 0 disables holes.
    pub hole_period: usize,
    pub fps: f32,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 192,
            distance: 2.0,
            step: 0.05,
            frames: 30,
            hole_period: 7,
            fps: 60.0,
        }
    }
}

/// Deterministic frames of a flat wall seen by a camera sliding along X.
pub struct SyntheticDepthSource {
    config: SyntheticConfig,
    depth: Vec<f32>,
    next_index: usize,
    active: bool,
}

impl SyntheticDepthSource {
    pub fn new(config: SyntheticConfig) -> Self {
        let depth = (0..config.height)
            .flat_map(|y| (0..config.width).map(move |x| (x, y)))
            .map(|(x, y)| {
                if config.hole_period > 0 && (x + y) % config.hole_period == 0 {
                    0.0
                } else {
                    config.distance
                }
            })
            .collect();

        info!(
            "Synthetic source: {}x{}, {} frames, wall at {}",
            config.width, config.height, config.frames, config.distance
        );
        Self {
            config,
            depth,
            next_index: 0,
            active: true,
        }
    }

    pub fn config(&self) -> &SyntheticConfig {
        &self.config
    }
}

impl DepthSource for SyntheticDepthSource {
    fn next_frame(&mut self) -> Result<Option<DepthFrame>, CaptureError> {
        if !self.active || self.next_index >= self.config.frames {
            self.active = false;
            return Ok(None);
        }

        let offset = self.config.step * self.next_index as f32;
        let pose = Pose::from_translation(Vec3::new(offset, 0.0, 0.0));
        self.next_index += 1;

        DepthFrame::new(
            self.config.width,
            self.config.height,
            self.depth.clone(),
            pose,
        )
        .map(Some)
    }

    fn frame_rate(&self) -> Option<f32> {
        Some(self.config.fps)
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn stop(&mut self) {
        self.active = false;
        info!("Synthetic source stopped after {} frames", self.next_index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CaptureConfig;

    fn small(frames: usize, step: f32) -> SyntheticConfig {
        SyntheticConfig {
            width: 8,
            height: 6,
            distance: 1.0,
            step,
            frames,
            hole_period: 0,
            fps: 30.0,
        }
    }

    #[test]
    fn test_synthetic_frame_count() {
        let mut source = SyntheticDepthSource::new(small(3, 1.0));
        let mut n = 0;
        while let Some(frame) = source.next_frame().unwrap() {
            assert_eq!(frame.dimensions(), (8, 6));
            n += 1;
        }
        assert_eq!(n, 3);
        assert!(!source.is_active());
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_synthetic_holes() {
        let config = SyntheticConfig {
            hole_period: 2,
            ..small(1, 0.0)
        };
        let frame = SyntheticDepthSource::new(config).next_frame().unwrap().unwrap();
        assert_eq!(frame.depth_at(0, 0), Some(0.0));
        assert_eq!(frame.depth_at(1, 0), Some(1.0));
        assert_eq!(frame.depth_at(1, 1), Some(0.0));
    }

    #[test]
    fn test_stop_ends_stream() {
        let mut source = SyntheticDepthSource::new(small(10, 1.0));
        assert!(source.next_frame().unwrap().is_some());
        source.stop();
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_run_source_static_camera_deduplicates() {
        let controller = CaptureController::new(CaptureConfig::with_stride(1)).unwrap();
        controller.start();
        let mut source = SyntheticDepthSource::new(small(5, 0.0));
        assert_eq!(run_source(&controller, &mut source).unwrap(), 5);
        assert_eq!(controller.store().len(), 8 * 6);
        assert_eq!(controller.frames_processed(), 5);
    }

    #[test]
    fn test_run_source_moving_camera_accumulates() {
        let controller = CaptureController::new(CaptureConfig::with_stride(2)).unwrap();
        controller.start();
        // A step of 8 clears the [-1, 1) NDC span, so frames never overlap.
        let mut source = SyntheticDepthSource::new(small(4, 8.0));
        run_source(&controller, &mut source).unwrap();
        assert_eq!(controller.store().len(), 4 * (4 * 3));
    }

    #[test]
    fn test_run_source_while_stopped() {
        let controller = CaptureController::new(CaptureConfig::default()).unwrap();
        let mut source = SyntheticDepthSource::new(small(2, 1.0));
        assert_eq!(run_source(&controller, &mut source).unwrap(), 2);
        assert!(controller.store().is_empty());
    }
}
