//! Depth frames as delivered by a depth-and-pose source.

use crate::error::CaptureError;
use glam::{Mat4, Vec3, Vec4};

/// Camera-to-world transform for a single frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose(Mat4);

impl Pose {
    pub const IDENTITY: Self = Self(Mat4::IDENTITY);

    pub fn new(matrix: Mat4) -> Self {
        Self(matrix)
    }

    /// Build from 16 values in column-major order.
    pub fn from_cols_array(cols: &[f32; 16]) -> Self {
        Self(Mat4::from_cols_array(cols))
    }

    /// A pose that only moves the camera.
    pub fn from_translation(translation: Vec3) -> Self {
        Self(Mat4::from_translation(translation))
    }

    pub fn matrix(&self) -> Mat4 {
        self.0
    }

    pub fn to_cols_array(&self) -> [f32; 16] {
        self.0.to_cols_array()
    }

    /// Matrix-vector product. `w` is returned as computed, never divided out.
    pub fn transform(&self, v: Vec4) -> Vec4 {
        self.0 * v
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<Mat4> for Pose {
    fn from(matrix: Mat4) -> Self {
        Self(matrix)
    }
}

/// One valid depth measurement at a pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthSample {
    pub x: usize,
    pub y: usize,
    /// Always finite and `> 0`.
    pub depth: f32,
}

/// Check that a row-major buffer of `actual` values covers `width x height`.
pub(crate) fn check_buffer_len(
    width: usize,
    height: usize,
    actual: usize,
) -> Result<(), CaptureError> {
    let expected = width
        .checked_mul(height)
        .ok_or(CaptureError::DimensionOverflow { width, height })?;
    if actual != expected {
        return Err(CaptureError::DimensionMismatch {
            width,
            height,
            expected,
            actual,
        });
    }
    Ok(())
}

/// A row-major depth buffer paired with the pose it was captured from.
///
/// The buffer length is checked against `width * height` on construction, so
/// everything downstream can index it freely.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthFrame {
    width: usize,
    height: usize,
    depth: Vec<f32>,
    pose: Pose,
}

impl DepthFrame {
    pub fn new(
        width: usize,
        height: usize,
        depth: Vec<f32>,
        pose: Pose,
    ) -> Result<Self, CaptureError> {
        check_buffer_len(width, height, depth.len())?;
        Ok(Self {
            width,
            height,
            depth,
            pose,
        })
    }

    /// Frame dimensions (width, height).
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn depth(&self) -> &[f32] {
        &self.depth
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Depth at pixel `(x, y)`, or `None` outside the frame.
    pub fn depth_at(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.depth[y * self.width + x])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_dimension_check() {
        let err = DepthFrame::new(4, 3, vec![1.0; 11], Pose::IDENTITY).unwrap_err();
        assert!(matches!(
            err,
            CaptureError::DimensionMismatch {
                expected: 12,
                actual: 11,
                ..
            }
        ));
        assert!(DepthFrame::new(4, 3, vec![1.0; 12], Pose::IDENTITY).is_ok());
    }

    #[test]
    fn test_overflowing_dimensions_rejected() {
        let err = DepthFrame::new(usize::MAX, 2, Vec::new(), Pose::IDENTITY).unwrap_err();
        assert!(matches!(err, CaptureError::DimensionOverflow { height: 2, .. }));
    }

    #[test]
    fn test_depth_at_is_row_major() {
        let depth: Vec<f32> = (0..6).map(|i| i as f32).collect();
        let frame = DepthFrame::new(3, 2, depth, Pose::IDENTITY).unwrap();
        assert_eq!(frame.depth_at(0, 0), Some(0.0));
        assert_eq!(frame.depth_at(2, 0), Some(2.0));
        assert_eq!(frame.depth_at(0, 1), Some(3.0));
        assert_eq!(frame.depth_at(3, 0), None);
        assert_eq!(frame.depth_at(0, 2), None);
    }

    #[test]
    fn test_pose_keeps_w() {
        let mut cols = Mat4::IDENTITY.to_cols_array();
        // Projective last row: w' = w + z.
        cols[11] = 1.0;
        let pose = Pose::from_cols_array(&cols);
        let out = pose.transform(Vec4::new(0.0, 0.0, 2.0, 1.0));
        assert_eq!(out, Vec4::new(0.0, 0.0, 2.0, 3.0));
    }

    #[test]
    fn test_translation_pose() {
        let pose = Pose::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let out = pose.transform(Vec4::new(1.0, 1.0, 1.0, 1.0));
        assert_eq!(out, Vec4::new(2.0, 3.0, 4.0, 1.0));
        assert_eq!(Pose::from_cols_array(&pose.to_cols_array()), pose);
    }
}
