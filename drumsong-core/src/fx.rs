//! Read-only view of the effect rack, consulted when a song is saved.
//!
//! The codec never loads or configures plugins itself. Whoever hosts effects
//! implements [`EffectHost`] and hands it to the save call; without a host
//! every slot is recorded as empty.

use crate::state::EffectInfo;

pub use crate::state::MAX_FX;

pub trait EffectHost {
    /// Snapshot of the plugin in `slot` (`0..MAX_FX`), or `None` if the slot is empty.
    fn slot(&self, slot: usize) -> Option<EffectInfo>;
}

/// A fixed rack, for hosts that already hold plain snapshots (and for tests).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticRack {
    pub slots: [Option<EffectInfo>; MAX_FX],
}

impl StaticRack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slot(mut self, slot: usize, info: EffectInfo) -> Self {
        if let Some(s) = self.slots.get_mut(slot) {
            *s = Some(info);
        }
        self
    }
}

impl EffectHost for StaticRack {
    fn slot(&self, slot: usize) -> Option<EffectInfo> {
        self.slots.get(slot).cloned().flatten()
    }
}
