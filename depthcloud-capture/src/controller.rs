//! Capture session orchestration.

use crate::config::CaptureConfig;
use crate::error::CaptureError;
use crate::frame::DepthFrame;
use crate::reconstruct::PointReconstructor;
use crate::sampler::DepthSampler;
use crate::store::PointCloudStore;
use depthcloud_data::{PlyError, PlyExporter, Point3D};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::{debug, info, warn};

/// Turns incoming depth frames into accumulated points and exports them.
///
/// All methods take `&self`; share the controller in an `Arc` between the
/// frame producer and the control path. Stopping only pauses: frames are
/// dropped but the accumulated cloud is kept until the next [`start`](Self::start).
#[derive(Debug)]
pub struct CaptureController {
    stride: NonZeroUsize,
    store: PointCloudStore,
    capturing: AtomicBool,
    frames_processed: AtomicU64,
}

impl CaptureController {
    /// Create a stopped controller with its own empty store.
    pub fn new(config: CaptureConfig) -> Result<Self, CaptureError> {
        Self::with_store(config, PointCloudStore::new())
    }

    /// Create a stopped controller accumulating into `store`.
    pub fn with_store(config: CaptureConfig, store: PointCloudStore) -> Result<Self, CaptureError> {
        Ok(Self {
            stride: config.validated_stride()?,
            store,
            capturing: AtomicBool::new(false),
            frames_processed: AtomicU64::new(0),
        })
    }

    /// Begin a new session: clears the store and starts accepting frames.
    ///
    /// Not atomic with respect to a frame already inside [`on_frame`](Self::on_frame):
    /// if `start` runs while such a frame is being reconstructed, that frame
    /// merges after the reset and lands in the new session.
    pub fn start(&self) {
        self.store.reset();
        self.frames_processed.store(0, Ordering::Relaxed);
        self.capturing.store(true, Ordering::Release);
        info!("Capture started (stride {})", self.stride);
    }

    /// Accept frames again without clearing the session.
    pub fn resume(&self) {
        self.capturing.store(true, Ordering::Release);
        info!("Capture resumed with {} points", self.store.len());
    }

    /// Stop accepting frames. A frame already in flight still completes.
    pub fn stop(&self) {
        if self.capturing.swap(false, Ordering::AcqRel) {
            info!(
                "Capture stopped after {} frames, {} points",
                self.frames_processed(),
                self.store.len()
            );
        }
    }

    pub fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::Acquire)
    }

    /// Frames merged since the session started.
    pub fn frames_processed(&self) -> u64 {
        self.frames_processed.load(Ordering::Relaxed)
    }

    pub fn store(&self) -> &PointCloudStore {
        &self.store
    }

    /// Reconstruct and merge one frame, returning the number of new points.
    ///
    /// Returns 0 without touching the store while stopped. The frame's points
    /// are collected before the store is locked and merged in one step.
    pub fn on_frame(&self, frame: &DepthFrame) -> usize {
        if !self.is_capturing() {
            return 0;
        }

        let reconstructor = PointReconstructor::for_frame(frame);
        let batch: Vec<Point3D> = DepthSampler::for_frame(frame, self.stride)
            .samples()
            .map(|sample| reconstructor.reconstruct(sample))
            .collect();

        let sampled = batch.len();
        let added = self.store.merge(batch);
        let frame_index = self.frames_processed.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(
            "Frame {}: {} samples, {} new points",
            frame_index, sampled, added
        );
        added
    }

    /// Encode the current cloud as a PLY document.
    ///
    /// Read-only on the store: a failed or empty export leaves the session as is.
    pub fn export_now(&self) -> Result<Vec<u8>, PlyError> {
        let snapshot = self.store.snapshot();
        match PlyExporter::write(&snapshot) {
            Ok(bytes) => {
                info!(
                    "Exported {} points ({} bytes)",
                    snapshot.len(),
                    bytes.len()
                );
                Ok(bytes)
            }
            Err(e) => {
                warn!("Export failed: {}", e);
                Err(e)
            }
        }
    }
}
