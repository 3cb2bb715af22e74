//! Undo log of the search, split into checkpoints.

use std::iter::Rev;
use std::ops::Deref;
use std::vec::Drain;

use crate::model::{SlotId, VarId};

/// A reversible mutation of the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Change {
    /// `value` was removed from the domain of `var`.
    Pruned { var: VarId, value: usize },
    /// `var` was added to the occupants of `slot`.
    Occupied { slot: SlotId, var: VarId },
    /// `var` received a value.
    Assigned { var: VarId },
}

#[derive(Debug, Clone)]
pub(crate) struct Trail<T> {
    current_checkpoint: usize,
    /// `delimiters[i]` is the trail length when checkpoint `i + 1` was opened.
    delimiters: Vec<usize>,
    entries: Vec<T>,
}

impl<T> Default for Trail<T> {
    fn default() -> Self {
        Trail {
            current_checkpoint: 0,
            delimiters: Vec::new(),
            entries: Vec::new(),
        }
    }
}

impl<T> Trail<T> {
    pub(crate) fn new_checkpoint(&mut self) {
        self.current_checkpoint += 1;
        self.delimiters.push(self.entries.len());
    }

    pub(crate) fn checkpoint(&self) -> usize {
        self.current_checkpoint
    }

    /// Closes every checkpoint above `checkpoint` and yields their entries,
    /// newest first.
    pub(crate) fn synchronise(&mut self, checkpoint: usize) -> Rev<Drain<'_, T>> {
        debug_assert!(checkpoint < self.current_checkpoint);

        let len = self.delimiters[checkpoint];
        self.current_checkpoint = checkpoint;
        self.delimiters.truncate(checkpoint);
        self.entries.drain(len..).rev()
    }

    pub(crate) fn push(&mut self, entry: T) {
        self.entries.push(entry);
    }
}

impl<T> Deref for Trail<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synchronise_drains_newest_first() {
        let mut trail = Trail::default();
        trail.new_checkpoint();
        trail.push(1);
        trail.push(2);
        trail.new_checkpoint();
        trail.push(3);

        let undone: Vec<_> = trail.synchronise(1).collect();
        assert_eq!(undone, [3]);
        assert_eq!(trail.checkpoint(), 1);

        let undone: Vec<_> = trail.synchronise(0).collect();
        assert_eq!(undone, [2, 1]);
        assert!(trail.is_empty());
    }

    #[test]
    fn entries_below_first_checkpoint_survive() {
        let mut trail = Trail::default();
        trail.push('a');
        trail.new_checkpoint();
        trail.push('b');
        trail.new_checkpoint();
        trail.push('c');

        let undone: Vec<_> = trail.synchronise(0).collect();
        assert_eq!(undone, ['c', 'b']);
        assert_eq!(&*trail, ['a']);
    }

    #[test]
    fn empty_checkpoint_undoes_nothing() {
        let mut trail: Trail<u8> = Trail::default();
        trail.new_checkpoint();
        assert_eq!(trail.synchronise(0).count(), 0);
        assert_eq!(trail.checkpoint(), 0);
    }
}
