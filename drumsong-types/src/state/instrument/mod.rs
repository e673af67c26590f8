//! Instrument state: mixer settings, envelope, sample selection, and the
//! per-component layer stacks.

mod layer;

pub use layer::{InstrumentComponent, InstrumentLayer, MAX_LAYERS};

use serde::{Deserialize, Serialize};

use crate::InstrumentId;

/// Number of effect sends per instrument (and effect slots per song).
pub const MAX_FX: usize = 4;

/// MIDI note sent for an instrument when none was assigned.
pub const MIDI_MIDDLE_C: i32 = 60;

/// How a layer is picked when several layers match a note's velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SampleSelection {
    #[default]
    Velocity,
    Random,
    RoundRobin,
}

/// Amplitude envelope. Attack, decay and release are in frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Adsr {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,  // 0.0-1.0
    pub release: f32,
}

impl Default for Adsr {
    fn default() -> Self {
        Self {
            attack: 0.0,
            decay: 0.0,
            sustain: 1.0,
            release: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub id: InstrumentId,
    pub name: String,
    /// Name of the drum kit this instrument came from; relative sample paths
    /// are resolved against this kit's directory.
    pub drumkit_name: String,
    pub volume: f32,
    pub muted: bool,
    pub pan_l: f32,
    pub pan_r: f32,
    pub gain: f32,
    pub apply_velocity: bool,
    pub filter_active: bool,
    pub filter_cutoff: f32,
    pub filter_resonance: f32,
    pub fx_levels: [f32; MAX_FX],
    pub adsr: Adsr,
    pub random_pitch_factor: f32,
    /// -1 = no mute group
    pub mute_group: i32,
    pub stop_notes: bool,
    pub sample_selection: SampleSelection,
    /// -1 = MIDI out disabled
    pub midi_out_channel: i32,
    pub midi_out_note: i32,
    /// -1 = not part of a hi-hat group
    pub hihat_group: i32,
    pub lower_cc: i32,
    pub higher_cc: i32,
    pub components: Vec<InstrumentComponent>,
}

impl Instrument {
    pub fn new(id: InstrumentId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            drumkit_name: String::new(),
            volume: 1.0,
            muted: false,
            pan_l: 1.0,
            pan_r: 1.0,
            gain: 1.0,
            apply_velocity: true,
            filter_active: false,
            filter_cutoff: 1.0,
            filter_resonance: 0.0,
            fx_levels: [0.0; MAX_FX],
            adsr: Adsr::default(),
            random_pitch_factor: 0.0,
            mute_group: -1,
            stop_notes: false,
            sample_selection: SampleSelection::Velocity,
            midi_out_channel: -1,
            midi_out_note: MIDI_MIDDLE_C,
            hihat_group: -1,
            lower_cc: 0,
            higher_cc: 127,
            components: Vec::new(),
        }
    }

    /// Total number of occupied layer slots over all components.
    pub fn layer_count(&self) -> usize {
        self.components.iter().map(|c| c.layers.len()).sum()
    }
}
