//! Deduplicated point sets and their summary statistics.

use crate::types::Point3D;
use glam::Vec3;
use std::collections::HashSet;
use std::collections::hash_set;

/// An unordered set of unique points.
///
/// Iteration order is unspecified but stable for a given instance, which is
/// what makes exporting a snapshot reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointCloud {
    points: HashSet<Point3D>,
}

/// Summary of a non-empty cloud.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudStats {
    pub count: usize,
    /// Axis-aligned bounds (min, max).
    pub min: Vec3,
    pub max: Vec3,
    /// Mean of all points.
    pub centroid: Vec3,
}

impl CloudStats {
    /// Extent of the bounding box along each axis.
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }
}

impl PointCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: HashSet::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Insert a point, returning `true` if it was not already present.
    pub fn insert(&mut self, point: Point3D) -> bool {
        self.points.insert(point)
    }

    pub fn contains(&self, point: &Point3D) -> bool {
        self.points.contains(point)
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn iter(&self) -> hash_set::Iter<'_, Point3D> {
        self.points.iter()
    }

    /// Insert every point of `batch`, returning how many were new.
    pub fn merge<I: IntoIterator<Item = Point3D>>(&mut self, batch: I) -> usize {
        let before = self.points.len();
        self.points.extend(batch);
        self.points.len() - before
    }

    /// Count, bounds and centroid, or `None` for an empty cloud.
    pub fn stats(&self) -> Option<CloudStats> {
        let mut iter = self.points.iter().map(|p| p.position());
        let first = iter.next()?;

        // Accumulate in f64 so large clouds don't lose the centroid to rounding.
        let mut sum = first.as_dvec3();
        let (mut min, mut max) = (first, first);
        for p in iter {
            min = min.min(p);
            max = max.max(p);
            sum += p.as_dvec3();
        }

        let count = self.points.len();
        Some(CloudStats {
            count,
            min,
            max,
            centroid: (sum / count as f64).as_vec3(),
        })
    }

    /// A copy of this cloud scaled by `factor` about its centroid.
    ///
    /// Scaling can map distinct points onto the same coordinates, in which case
    /// they collapse and the result is smaller than the input.
    pub fn scaled_about_centroid(&self, factor: f32) -> PointCloud {
        let Some(stats) = self.stats() else {
            return PointCloud::new();
        };
        self.points
            .iter()
            .map(|p| Point3D::from(stats.centroid + (p.position() - stats.centroid) * factor))
            .collect()
    }
}

impl FromIterator<Point3D> for PointCloud {
    fn from_iter<I: IntoIterator<Item = Point3D>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl Extend<Point3D> for PointCloud {
    fn extend<I: IntoIterator<Item = Point3D>>(&mut self, iter: I) {
        self.points.extend(iter);
    }
}

impl IntoIterator for PointCloud {
    type Item = Point3D;
    type IntoIter = hash_set::IntoIter<Point3D>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

impl<'a> IntoIterator for &'a PointCloud {
    type Item = &'a Point3D;
    type IntoIter = hash_set::Iter<'a, Point3D>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
