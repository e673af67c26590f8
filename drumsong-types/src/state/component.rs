//! Drum-kit components (e.g. separate close-mic and room channels of a kit).

use serde::{Deserialize, Serialize};

use crate::ComponentId;

/// A named mixing channel shared by all instruments of a drum kit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrumkitComponent {
    pub id: ComponentId,
    pub name: String,
    pub volume: f32,
}

impl DrumkitComponent {
    pub fn new(id: ComponentId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            volume: 1.0,
        }
    }
}
