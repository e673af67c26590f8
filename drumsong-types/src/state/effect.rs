//! Descriptive snapshot of effect-rack slots, as stored in song files.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlPort {
    pub name: String,
    pub value: f32,
}

/// What a song file records about one loaded effect plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectInfo {
    pub label: String,
    pub library_path: String,
    pub enabled: bool,
    pub volume: f32,
    pub input_ports: Vec<ControlPort>,
    pub output_ports: Vec<ControlPort>,
}

impl EffectInfo {
    pub fn new(label: &str, library_path: &str) -> Self {
        Self {
            label: label.to_string(),
            library_path: library_path.to_string(),
            enabled: true,
            volume: 1.0,
            input_ports: Vec::new(),
            output_ports: Vec::new(),
        }
    }
}
