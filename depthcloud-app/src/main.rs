//! Depthcloud Application
//!
//! Command-line front end for depth point cloud capture.
//!
//! Commands:
//! - `scan`: run a capture session and export the cloud as PLY
//! - `record`: write synthetic depth frames to a JSON-lines recording
//! - `inspect`: summarize a PLY file and optionally write a rescaled copy

mod app;
mod errors;
mod output;

use app::{FrameInput, InspectConfig, LoggingConfig, ScanConfig};
use clap::{Args, Parser, Subcommand};
use depthcloud_capture::{CaptureConfig, DEFAULT_STRIDE, SyntheticConfig};
use depthcloud_data::SUGGESTED_FILE_NAME;
use errors::AppError;
use std::path::PathBuf;
use tracing::info;

/// Depthcloud - accumulate depth frames into a PLY point cloud
#[derive(Parser, Debug)]
#[command(name = "depthcloud")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Send spans to Tracy (requires the `tracy` feature)
    #[arg(long, global = true)]
    tracy: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Capture frames and export the accumulated cloud
    Scan {
        /// Replay frames from a JSON-lines recording instead of the synthetic source
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Nominal frame rate reported for a recording
        #[arg(long, requires = "input")]
        fps: Option<f32>,

        /// Pixel step between samples
        #[arg(short, long, default_value_t = DEFAULT_STRIDE)]
        stride: usize,

        /// Destination PLY file
        #[arg(short, long, default_value = SUGGESTED_FILE_NAME)]
        output: PathBuf,

        #[command(flatten)]
        synthetic: SyntheticArgs,
    },

    /// Write synthetic frames to a JSON-lines recording
    Record {
        /// Destination recording
        #[arg(short, long, default_value = "frames.jsonl")]
        output: PathBuf,

        #[command(flatten)]
        synthetic: SyntheticArgs,
    },

    /// Print a PLY file's point count and extent
    Inspect {
        /// PLY file to load
        file: PathBuf,

        /// Scale the cloud about its centroid and write the result
        #[arg(long)]
        scale: Option<f32>,

        /// Destination for the scaled copy
        #[arg(short, long, requires = "scale")]
        output: Option<PathBuf>,
    },
}

/// Synthetic depth source parameters
#[derive(Args, Debug)]
struct SyntheticArgs {
    /// Number of frames to generate
    #[arg(long, default_value_t = 30)]
    frames: usize,

    /// Depth buffer width
    #[arg(long, default_value_t = 256)]
    width: usize,

    /// Depth buffer height
    #[arg(long, default_value_t = 192)]
    height: usize,

    /// Distance to the synthetic wall
    #[arg(long, default_value_t = 2.0)]
    distance: f32,

    /// Camera movement along X per frame
    #[arg(long, default_value_t = 0.05)]
    step: f32,
}

impl From<SyntheticArgs> for SyntheticConfig {
    fn from(args: SyntheticArgs) -> Self {
        Self {
            width: args.width,
            height: args.height,
            distance: args.distance,
            step: args.step,
            frames: args.frames,
            ..SyntheticConfig::default()
        }
    }
}

fn run(command: Command) -> Result<(), AppError> {
    match command {
        Command::Scan {
            input,
            fps,
            stride,
            output,
            synthetic,
        } => {
            let input = match input {
                Some(path) => FrameInput::Recorded { path, fps },
                None => FrameInput::Synthetic(synthetic.into()),
            };
            let summary = app::run_scan(&ScanConfig {
                capture: CaptureConfig::with_stride(stride),
                input,
                output,
            })?;
            info!(
                "Scan complete: {} frames, {} points, {} bytes",
                summary.frames, summary.points, summary.bytes
            );
            println!("{}", summary.output.display());
        }
        Command::Record { output, synthetic } => {
            app::run_record(synthetic.into(), &output)?;
            println!("{}", output.display());
        }
        Command::Inspect {
            file,
            scale,
            output,
        } => {
            let report = app::run_inspect(&InspectConfig {
                input: file,
                scale,
                output,
            })?;
            let stats = report.stats;
            println!("points:   {}", stats.count);
            println!("min:      {:?}", stats.min.to_array());
            println!("max:      {:?}", stats.max.to_array());
            println!("centroid: {:?}", stats.centroid.to_array());
            if let Some(path) = report.scaled_output {
                println!("scaled:   {}", path.display());
            }
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    app::init_logging(&LoggingConfig {
        level: cli.log_level,
        enable_tracy: cli.tracy,
    });

    if let Err(e) = run(cli.command) {
        eprintln!("depthcloud error: {}", e);
        std::process::exit(1);
    }
}
