//! Flag sets: the selection made within one group.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::transcoder::{BITS_PER_BYTE, CONTINUE_BIT};
use crate::vocab::{FlagIndex, Group, Vocabulary};
use crate::Result;

/// A vocabulary entry together with its selection state, for toggle UIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagState {
    pub name: String,
    pub set: bool,
}

/// Selected flag indices of one group.
///
/// Indices the vocabulary does not name are kept, so a code written by a
/// newer vocabulary survives a trimmed re-encode, but they are never listed
/// by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSet {
    group: Group,
    bits: BTreeSet<FlagIndex>,
}

impl FlagSet {
    /// An empty selection for `group`.
    pub fn empty(group: Group) -> Self {
        Self {
            group,
            bits: BTreeSet::new(),
        }
    }

    pub fn from_indices(group: Group, indices: impl IntoIterator<Item = FlagIndex>) -> Self {
        Self {
            group,
            bits: indices.into_iter().collect(),
        }
    }

    pub fn group(&self) -> Group {
        self.group
    }

    pub fn vocabulary(&self) -> &'static Vocabulary {
        self.group.vocabulary()
    }

    /// Whether the named flag is selected. Unknown names are never set.
    pub fn is_set(&self, name: &str) -> bool {
        self.vocabulary()
            .index_of(name)
            .is_some_and(|i| self.bits.contains(&i))
    }

    pub fn contains(&self, index: FlagIndex) -> bool {
        self.bits.contains(&index)
    }

    /// Select a flag. Returns whether the selection changed.
    pub fn set(&mut self, name: &str) -> Result<bool> {
        let index = self.vocabulary().require(name)?;
        Ok(self.bits.insert(index))
    }

    /// Deselect a flag. Returns whether the selection changed.
    pub fn unset(&mut self, name: &str) -> Result<bool> {
        let index = self.vocabulary().require(name)?;
        Ok(self.bits.remove(&index))
    }

    /// Replace the whole selection.
    pub fn reload(&mut self, indices: impl IntoIterator<Item = FlagIndex>) {
        self.bits = indices.into_iter().collect();
    }

    pub fn clear(&mut self) {
        self.bits.clear();
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Selected indices, ascending, including unknown ones.
    pub fn indices(&self) -> impl Iterator<Item = FlagIndex> + '_ {
        self.bits.iter().copied()
    }

    /// Selected indices the vocabulary has no name for.
    pub fn unknown_indices(&self) -> Vec<FlagIndex> {
        let vocab = self.vocabulary();
        self.bits.iter().copied().filter(|&i| !vocab.contains(i)).collect()
    }

    /// Names of the selected flags, in vocabulary order.
    pub fn get_set_flags(&self) -> Vec<&'static str> {
        self.vocabulary()
            .entries()
            .iter()
            .filter(|e| self.bits.contains(&e.index))
            .map(|e| e.name)
            .collect()
    }

    /// Every vocabulary entry with its state, in vocabulary order.
    pub fn get_flags(&self) -> Vec<FlagState> {
        self.vocabulary()
            .entries()
            .iter()
            .map(|e| FlagState {
                name: e.name.to_string(),
                set: self.bits.contains(&e.index),
            })
            .collect()
    }

    /// Pack the selection, 7 flags per byte.
    ///
    /// Untrimmed, the output covers the whole vocabulary. Trimmed, it stops at
    /// the byte holding the highest selected index, and an empty selection is
    /// a single zero byte.
    pub fn to_bytes(&self, trim: bool) -> Vec<u8> {
        let num_bytes = self.num_bytes(trim);

        (0..num_bytes)
            .map(|i| {
                let mut byte = if i + 1 < num_bytes { CONTINUE_BIT } else { 0 };
                let base = i as FlagIndex * BITS_PER_BYTE;
                for bit in self.bits.range(base..base + BITS_PER_BYTE) {
                    byte |= 1 << (bit - base);
                }
                byte
            })
            .collect()
    }

    fn num_bytes(&self, trim: bool) -> usize {
        let highest = if trim {
            self.bits.last().copied()
        } else {
            self.vocabulary().max_index()
        };

        match highest {
            Some(highest) => (highest / BITS_PER_BYTE + 1) as usize,
            None => 1,
        }
    }
}
