//! Song-level automation paths.

use serde::{Deserialize, Serialize};

/// What an automation path adjusts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AutomationTarget {
    #[default]
    Velocity,
}

impl AutomationTarget {
    /// Token used for the `adjust` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            AutomationTarget::Velocity => "velocity",
        }
    }

    pub fn from_token(s: &str) -> Option<AutomationTarget> {
        match s {
            "velocity" => Some(AutomationTarget::Velocity),
            _ => None,
        }
    }
}

/// A single control point. `x` is the position in bars, `y` the value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AutomationPoint {
    pub x: f32,
    pub y: f32,
}

/// Control curve over the song, points kept sorted by `x`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationPath {
    pub adjust: AutomationTarget,
    points: Vec<AutomationPoint>,
}

impl AutomationPath {
    /// The velocity path every song starts with.
    pub fn velocity() -> Self {
        Self {
            adjust: AutomationTarget::Velocity,
            points: Vec::new(),
        }
    }

    /// Insert a point, replacing any existing point at the same `x`.
    pub fn add_point(&mut self, x: f32, y: f32) {
        match self.points.binary_search_by(|p| p.x.total_cmp(&x)) {
            Ok(idx) => self.points[idx].y = y,
            Err(idx) => self.points.insert(idx, AutomationPoint { x, y }),
        }
    }

    pub fn points(&self) -> &[AutomationPoint] {
        &self.points
    }
}
