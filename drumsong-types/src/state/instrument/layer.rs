//! Per-component layer stacks of an instrument.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::state::sample::Sample;
use crate::ComponentId;

/// Number of layer slots in one instrument component.
pub const MAX_LAYERS: usize = 16;

/// One velocity-switched sample of an instrument component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentLayer {
    pub start_velocity: f32,
    pub end_velocity: f32,
    pub gain: f32,
    /// Pitch offset in semitones
    pub pitch: f32,
    pub sample: Sample,
}

impl InstrumentLayer {
    pub fn new(sample: Sample) -> Self {
        Self {
            start_velocity: 0.0,
            end_velocity: 1.0,
            gain: 1.0,
            pitch: 0.0,
            sample,
        }
    }
}

/// The layers an instrument plays through one drum-kit component.
///
/// Slots are sparse: only occupied indices are stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentComponent {
    pub component_id: ComponentId,
    pub gain: f32,
    pub layers: BTreeMap<usize, InstrumentLayer>,
}

impl InstrumentComponent {
    pub fn new(component_id: ComponentId) -> Self {
        Self {
            component_id,
            gain: 1.0,
            layers: BTreeMap::new(),
        }
    }

    pub fn layer(&self, slot: usize) -> Option<&InstrumentLayer> {
        self.layers.get(&slot)
    }

    /// Place a layer in `slot`, returning the previous occupant.
    /// Slots at or beyond [`MAX_LAYERS`] are rejected and handed back.
    pub fn set_layer(
        &mut self,
        slot: usize,
        layer: InstrumentLayer,
    ) -> Result<Option<InstrumentLayer>, InstrumentLayer> {
        if slot >= MAX_LAYERS {
            return Err(layer);
        }
        Ok(self.layers.insert(slot, layer))
    }

    /// Occupied slots in index order.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &InstrumentLayer)> {
        self.layers.iter().map(|(slot, layer)| (*slot, layer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_are_sparse_and_bounded() {
        let mut component = InstrumentComponent::new(ComponentId::new(0));
        assert!(component.set_layer(3, InstrumentLayer::new(Sample::new("a.wav"))).is_ok());
        assert!(component.set_layer(0, InstrumentLayer::new(Sample::new("b.wav"))).is_ok());
        assert!(component.set_layer(MAX_LAYERS, InstrumentLayer::new(Sample::new("c.wav"))).is_err());

        let slots: Vec<usize> = component.occupied().map(|(slot, _)| slot).collect();
        assert_eq!(slots, vec![0, 3]);
        assert!(component.layer(2).is_none());
    }

    #[test]
    fn set_layer_returns_previous() {
        let mut component = InstrumentComponent::new(ComponentId::new(0));
        component.set_layer(1, InstrumentLayer::new(Sample::new("a.wav"))).ok();
        let previous = component
            .set_layer(1, InstrumentLayer::new(Sample::new("b.wav")))
            .ok()
            .flatten();
        assert_eq!(previous.map(|l| l.sample.filepath), Some("a.wav".into()));
    }
}
