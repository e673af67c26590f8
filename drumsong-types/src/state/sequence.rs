//! Pattern sequence: the song-mode arrangement of patterns.

use serde::{Deserialize, Serialize};

/// Ordered columns of the song; each column plays a group of patterns at once.
/// Patterns are referenced by name and a name may repeat within a group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternSequence {
    pub groups: Vec<Vec<String>>,
}

impl PatternSequence {
    pub fn push_group<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups.push(names.into_iter().map(Into::into).collect());
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
