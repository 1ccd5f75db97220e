//! Session-wide point accumulation shared between capture and export.

use depthcloud_data::{Point3D, PointCloud};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Thread-safe, deduplicating accumulator for one capture session.
///
/// Cloning yields another handle to the same set. A batch is inserted under a
/// single write lock, so a [`snapshot`](Self::snapshot) sees either all of a
/// merge or none of it.
///
/// Deduplication is exact coordinate equality. Samples of the same surface
/// from slightly different poses land on different bits and are all kept.
#[derive(Debug, Clone, Default)]
pub struct PointCloudStore {
    cloud: Arc<RwLock<PointCloud>>,
}

impl PointCloudStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Every writer leaves the set in a valid state, so a poisoned lock is still
    // safe to use.
    fn read(&self) -> RwLockReadGuard<'_, PointCloud> {
        self.cloud.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, PointCloud> {
        self.cloud.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a batch, returning how many points were new.
    pub fn merge<I: IntoIterator<Item = Point3D>>(&self, batch: I) -> usize {
        let added = self.write().merge(batch);
        debug!("Merged batch: {} new points", added);
        added
    }

    /// Point-in-time copy of the accumulated set.
    pub fn snapshot(&self) -> PointCloud {
        self.read().clone()
    }

    pub fn reset(&self) {
        self.write().clear();
        debug!("Point cloud store reset");
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}
