//! Command implementations and their configuration.

use crate::errors::AppError;
use crate::output::save_atomically;
use depthcloud_capture::{
    CaptureConfig, CaptureController, DepthSource, RecordedDepthSource, SyntheticConfig,
    SyntheticDepthSource, run_source, write_frame,
};
use depthcloud_data::{CloudStats, PlyError, PlyExporter, SUGGESTED_FILE_NAME, load_points_from_ply};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use tracing::{info, warn};

/// Logging configuration.
pub struct LoggingConfig {
    pub level: String,
    pub enable_tracy: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            enable_tracy: false,
        }
    }
}

/// Where scan frames come from.
#[derive(Debug, Clone)]
pub enum FrameInput {
    Synthetic(SyntheticConfig),
    Recorded { path: PathBuf, fps: Option<f32> },
}

/// Configuration for a capture session run from the command line.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub capture: CaptureConfig,
    pub input: FrameInput,
    pub output: PathBuf,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            capture: CaptureConfig::default(),
            input: FrameInput::Synthetic(SyntheticConfig::default()),
            output: PathBuf::from(SUGGESTED_FILE_NAME),
        }
    }
}

/// Outcome of a completed scan.
#[derive(Debug, Clone)]
pub struct ScanSummary {
    pub frames: u64,
    pub points: usize,
    pub bytes: usize,
    pub output: PathBuf,
}

/// Configuration for inspecting an existing PLY file.
#[derive(Debug, Clone)]
pub struct InspectConfig {
    pub input: PathBuf,
    /// Scale factor applied about the centroid before writing a copy.
    pub scale: Option<f32>,
    /// Destination for the scaled copy. Defaults to `<stem>_scaled.ply`.
    pub output: Option<PathBuf>,
}

/// Result of inspecting a PLY file.
#[derive(Debug, Clone)]
pub struct InspectReport {
    pub stats: CloudStats,
    pub scaled_output: Option<PathBuf>,
}

pub fn init_logging(logging: &LoggingConfig) {
    #[cfg(feature = "tracy")]
    {
        if logging.enable_tracy {
            use tracing_subscriber::Layer;
            use tracing_subscriber::layer::SubscriberExt;
            use tracing_subscriber::util::SubscriberInitExt;
            tracing_subscriber::registry()
                .with(tracing_tracy::TracyLayer::default())
                .with(
                    tracing_subscriber::fmt::layer().with_filter(
                        tracing_subscriber::EnvFilter::try_from_default_env()
                            .unwrap_or_else(|_| {
                                tracing_subscriber::EnvFilter::new(&logging.level)
                            }),
                    ),
                )
                .init();
            return;
        }
    }

    #[cfg(not(feature = "tracy"))]
    {
        if logging.enable_tracy {
            eprintln!("Tracy requested but depthcloud was built without the `tracy` feature");
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level)),
        )
        .with_target(false)
        .init();
}

fn open_source(input: &FrameInput) -> Result<Box<dyn DepthSource + Send>, AppError> {
    let source: Box<dyn DepthSource + Send> = match input {
        FrameInput::Synthetic(config) => Box::new(SyntheticDepthSource::new(*config)),
        FrameInput::Recorded { path, fps } => {
            let source = RecordedDepthSource::open(path)?;
            match fps {
                Some(fps) => Box::new(source.with_frame_rate(*fps)),
                None => Box::new(source),
            }
        }
    };
    Ok(source)
}

/// Capture every frame of the configured input, then export and save the cloud.
///
/// Frames are produced on a dedicated thread, the way a depth sensor callback
/// would deliver them. Nothing is written when the session gathered no points.
pub fn run_scan(config: &ScanConfig) -> Result<ScanSummary, AppError> {
    let controller = Arc::new(CaptureController::new(config.capture)?);
    let mut source = open_source(&config.input)?;
    if let Some(fps) = source.frame_rate() {
        info!("Source reports {:.1} fps", fps);
    }

    controller.start();
    let producer = {
        let controller = Arc::clone(&controller);
        thread::Builder::new()
            .name("depth-producer".to_string())
            .spawn(move || run_source(&controller, source.as_mut()))?
    };
    let frames = producer.join().map_err(|_| AppError::ProducerPanicked)??;
    controller.stop();

    let bytes = controller.export_now()?;
    save_atomically(&bytes, &config.output)?;

    Ok(ScanSummary {
        frames,
        points: controller.store().len(),
        bytes: bytes.len(),
        output: config.output.clone(),
    })
}

/// Write synthetic frames as a JSON-lines recording.
pub fn run_record(synthetic: SyntheticConfig, output: &Path) -> Result<u64, AppError> {
    let mut source = SyntheticDepthSource::new(synthetic);
    let mut writer = BufWriter::new(File::create(output)?);
    let mut frames = 0;
    while let Some(frame) = source.next_frame()? {
        write_frame(&frame, &mut writer)?;
        frames += 1;
    }
    writer.flush()?;
    info!("Recorded {} frames to {}", frames, output.display());
    Ok(frames)
}

fn scaled_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "pointcloud".to_string());
    input.with_file_name(format!("{stem}_scaled.ply"))
}

/// Load a PLY file, report its extent and optionally write a scaled copy.
pub fn run_inspect(config: &InspectConfig) -> Result<InspectReport, AppError> {
    let cloud = load_points_from_ply(&config.input)?;
    let Some(stats) = cloud.stats() else {
        warn!("{} contains no points", config.input.display());
        return Err(PlyError::EmptyCloud.into());
    };
    info!(
        "{} points, bounds {:?} .. {:?}, centroid {:?}",
        stats.count, stats.min, stats.max, stats.centroid
    );

    let scaled_output = match config.scale {
        Some(factor) => {
            let output = config
                .output
                .clone()
                .unwrap_or_else(|| scaled_path(&config.input));
            let scaled = cloud.scaled_about_centroid(factor);
            if scaled.len() < cloud.len() {
                warn!(
                    "Scaling by {} merged {} coincident points",
                    factor,
                    cloud.len() - scaled.len()
                );
            }
            save_atomically(&PlyExporter::write(&scaled)?, &output)?;
            Some(output)
        }
        None => None,
    };

    Ok(InspectReport {
        stats,
        scaled_output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use depthcloud_data::{Point3D, PointCloud};
    use std::fs;
    use tempfile::tempdir;

    fn synthetic(frames: usize) -> SyntheticConfig {
        SyntheticConfig {
            width: 16,
            height: 12,
            distance: 1.5,
            step: 4.0,
            frames,
            hole_period: 5,
            fps: 30.0,
        }
    }

    #[test]
    fn test_scan_writes_ply() {
        let dir = tempdir().unwrap();
        let config = ScanConfig {
            capture: CaptureConfig::with_stride(1),
            input: FrameInput::Synthetic(synthetic(3)),
            output: dir.path().join("scan.ply"),
        };

        let summary = run_scan(&config).unwrap();
        assert_eq!(summary.frames, 3);
        assert!(summary.points > 0);

        let loaded = load_points_from_ply(&summary.output).unwrap();
        assert_eq!(loaded.len(), summary.points);
        assert_eq!(fs::metadata(&summary.output).unwrap().len() as usize, summary.bytes);
    }

    #[test]
    fn test_scan_without_points_writes_nothing() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("empty.ply");
        let config = ScanConfig {
            capture: CaptureConfig::default(),
            input: FrameInput::Synthetic(SyntheticConfig {
                distance: 0.0,
                ..synthetic(2)
            }),
            output: output.clone(),
        };

        assert!(matches!(
            run_scan(&config),
            Err(AppError::Ply(PlyError::EmptyCloud))
        ));
        assert!(!output.exists());
    }

    #[test]
    fn test_recorded_scan_matches_synthetic() {
        let dir = tempdir().unwrap();
        let recording = dir.path().join("frames.jsonl");
        assert_eq!(run_record(synthetic(4), &recording).unwrap(), 4);

        let live = ScanConfig {
            capture: CaptureConfig::with_stride(2),
            input: FrameInput::Synthetic(synthetic(4)),
            output: dir.path().join("live.ply"),
        };
        let replay = ScanConfig {
            input: FrameInput::Recorded {
                path: recording,
                fps: None,
            },
            output: dir.path().join("replay.ply"),
            ..live.clone()
        };

        run_scan(&live).unwrap();
        run_scan(&replay).unwrap();
        assert_eq!(
            load_points_from_ply(&live.output).unwrap(),
            load_points_from_ply(&replay.output).unwrap()
        );
    }

    #[test]
    fn test_inspect_and_scale() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("cloud.ply");
        let cloud: PointCloud = [Point3D::new(0.0, 0.0, 0.0), Point3D::new(2.0, 2.0, 2.0)]
            .into_iter()
            .collect();
        fs::write(&input, PlyExporter::write(&cloud).unwrap()).unwrap();

        let report = run_inspect(&InspectConfig {
            input: input.clone(),
            scale: Some(10.0),
            output: None,
        })
        .unwrap();
        assert_eq!(report.stats.count, 2);

        let scaled_path = report.scaled_output.unwrap();
        assert_eq!(scaled_path, dir.path().join("cloud_scaled.ply"));
        let scaled = load_points_from_ply(&scaled_path).unwrap();
        assert!(scaled.contains(&Point3D::new(-9.0, -9.0, -9.0)));
        assert!(scaled.contains(&Point3D::new(11.0, 11.0, 11.0)));
    }

    #[test]
    fn test_inspect_missing_file() {
        let dir = tempdir().unwrap();
        let result = run_inspect(&InspectConfig {
            input: dir.path().join("nope.ply"),
            scale: None,
            output: None,
        });
        assert!(matches!(result, Err(AppError::Ply(PlyError::Io(_)))));
    }
}
