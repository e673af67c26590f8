//! Sample references and their editing settings (loops, time-stretch, envelopes).
//!
//! Audio data itself is not part of the song model; a `Sample` only names the
//! file and carries the edits applied to it.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Playback direction of the loop region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoopMode {
    #[default]
    Forward,
    Reverse,
    PingPong,
}

impl LoopMode {
    /// Token used in song files.
    pub fn as_str(self) -> &'static str {
        match self {
            LoopMode::Forward => "forward",
            LoopMode::Reverse => "reverse",
            LoopMode::PingPong => "pingpong",
        }
    }
}

/// Loop region in frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Loops {
    pub start_frame: i32,
    pub loop_frame: i32,
    pub end_frame: i32,
    /// Number of extra repetitions of the loop region
    pub count: i32,
    pub mode: LoopMode,
}

/// Time-stretch settings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rubberband {
    pub enabled: bool,
    pub divider: f32,
    /// Stretcher quality preset
    pub c_settings: i32,
    pub pitch: f32,
}

/// One point of a volume or pan envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopePoint {
    pub frame: i32,
    pub value: i32,
}

impl EnvelopePoint {
    pub fn new(frame: i32, value: i32) -> Self {
        Self { frame, value }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub filepath: PathBuf,
    /// Whether loop/stretch/envelope edits have been applied
    pub is_modified: bool,
    pub loops: Loops,
    pub rubberband: Rubberband,
    pub volume_envelope: Vec<EnvelopePoint>,
    pub pan_envelope: Vec<EnvelopePoint>,
}

impl Sample {
    pub fn new(filepath: impl Into<PathBuf>) -> Self {
        Self {
            filepath: filepath.into(),
            is_modified: false,
            loops: Loops::default(),
            rubberband: Rubberband::default(),
            volume_envelope: Vec::new(),
            pan_envelope: Vec::new(),
        }
    }
}
