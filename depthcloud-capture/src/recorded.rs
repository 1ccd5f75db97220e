//! Replay of depth frames recorded as JSON lines.
//!
//! Each non-blank line holds one frame:
//!
//! ```json
//! {"width":2,"height":1,"depth":[1.5,null],"pose":[1,0,0,0, 0,1,0,0, 0,0,1,0, 0,0,0,1]}
//! ```
//!
//! `pose` is column-major. A `null` depth reads as "no measurement".

use crate::error::CaptureError;
use crate::frame::{DepthFrame, Pose};
use crate::source::DepthSource;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines, Write};
use std::path::Path;
use tracing::{debug, info};

/// On-disk form of one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    pub width: usize,
    pub height: usize,
    pub depth: Vec<Option<f32>>,
    pub pose: [f32; 16],
}

impl RecordedFrame {
    pub fn into_frame(self) -> Result<DepthFrame, CaptureError> {
        let depth = self.depth.into_iter().map(|d| d.unwrap_or(0.0)).collect();
        DepthFrame::new(
            self.width,
            self.height,
            depth,
            Pose::from_cols_array(&self.pose),
        )
    }
}

impl From<&DepthFrame> for RecordedFrame {
    fn from(frame: &DepthFrame) -> Self {
        Self {
            width: frame.width(),
            height: frame.height(),
            depth: frame.depth().iter().copied().map(Some).collect(),
            pose: frame.pose().to_cols_array(),
        }
    }
}

/// Append `frame` to a recording as a single line.
pub fn write_frame<W: Write>(frame: &DepthFrame, mut writer: W) -> Result<(), CaptureError> {
    serde_json::to_writer(&mut writer, &RecordedFrame::from(frame))?;
    writeln!(writer)?;
    Ok(())
}

/// Depth source replaying a JSON-lines recording.
pub struct RecordedDepthSource<R> {
    lines: Lines<R>,
    line: usize,
    frames: u64,
    frame_rate: Option<f32>,
    active: bool,
}

impl RecordedDepthSource<BufReader<File>> {
    /// Open a recording on disk.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CaptureError> {
        info!("Opening depth recording: {}", path.as_ref().display());
        let file = File::open(path.as_ref())?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> RecordedDepthSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
            frames: 0,
            frame_rate: None,
            active: true,
        }
    }

    /// Report a nominal frame rate for the recording.
    pub fn with_frame_rate(mut self, fps: f32) -> Self {
        self.frame_rate = Some(fps);
        self
    }
}

impl<R: BufRead> DepthSource for RecordedDepthSource<R> {
    fn next_frame(&mut self) -> Result<Option<DepthFrame>, CaptureError> {
        while self.active {
            let Some(text) = self.lines.next().transpose()? else {
                self.active = false;
                debug!("Recording ended after {} frames", self.frames);
                break;
            };
            self.line += 1;
            if text.trim().is_empty() {
                continue;
            }

            let recorded: RecordedFrame =
                serde_json::from_str(&text).map_err(|source| CaptureError::Recording {
                    line: self.line,
                    source,
                })?;
            self.frames += 1;
            return recorded.into_frame().map(Some);
        }
        Ok(None)
    }

    fn frame_rate(&self) -> Option<f32> {
        self.frame_rate
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn stop(&mut self) {
        self.active = false;
    }
}
