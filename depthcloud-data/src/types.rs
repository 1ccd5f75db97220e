//! Core point type shared by the capture pipeline and the file formats.

use glam::Vec3;
use ordered_float::OrderedFloat;
use std::hash::{Hash, Hasher};

/// A reconstructed point in world space.
///
/// Identity is exact coordinate equality over `(x, y, z)`. Two points that
/// differ in the last bit of any coordinate are distinct, so this never merges
/// samples that are merely close together. `0.0` and `-0.0` compare equal, and
/// a NaN coordinate compares equal to another NaN so the type can be `Eq`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Point3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3D {
    /// Create a point from its coordinates.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Coordinates as an `[x, y, z]` array.
    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// `true` when no coordinate is NaN or infinite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Coordinates as a glam vector.
    pub fn position(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    fn key(&self) -> [OrderedFloat<f32>; 3] {
        [
            OrderedFloat(self.x),
            OrderedFloat(self.y),
            OrderedFloat(self.z),
        ]
    }
}

impl PartialEq for Point3D {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Point3D {}

impl Hash for Point3D {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl From<Vec3> for Point3D {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<[f32; 3]> for Point3D {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Point3D> for Vec3 {
    fn from(p: Point3D) -> Self {
        p.position()
    }
}
