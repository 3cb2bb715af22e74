//! Hour-long board slots and their live occupancy.

use chrono::{NaiveDateTime, TimeDelta};
use log::warn;
use std::collections::HashMap;
use std::fmt::Display;
use std::ops::Index;

use super::VarId;

/// Handle of a [`Slot`] inside a [`SlotTable`].
///
/// Slots are numbered in chronological order, so comparing ids compares times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub(crate) usize);

impl SlotId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One assignable hour of the board.
///
/// # Invariants
///
/// - Only cells that were empty on the input board become slots
/// - Each occupant is recorded together with its concurrency limit, so capacity
///   can be computed without looking the variable up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    time: NaiveDateTime,
    position: (usize, usize),
    occupants: Vec<(VarId, u32)>,
}

impl Slot {
    pub(crate) fn new(time: NaiveDateTime, position: (usize, usize)) -> Self {
        Self {
            time,
            position,
            occupants: Vec::new(),
        }
    }

    pub fn time(&self) -> NaiveDateTime {
        self.time
    }

    /// Board coordinates as `(day index, hour index)`.
    pub fn position(&self) -> (usize, usize) {
        self.position
    }

    pub fn occupants(&self) -> impl Iterator<Item = VarId> + '_ {
        self.occupants.iter().map(|&(var, _)| var)
    }

    pub fn occupant_count(&self) -> usize {
        self.occupants.len()
    }

    pub fn is_occupied_by(&self, var: VarId) -> bool {
        self.occupants.iter().any(|&(v, _)| v == var)
    }

    /// Remaining room in this slot for an occurrence with `candidate_limit`.
    ///
    /// The room is the smallest limit among the current occupants and the
    /// candidate, minus the number of occupants. A slot with no occupants and
    /// no candidate is unbounded. Values `<= 0` mean the slot is full.
    pub fn capacity(&self, candidate_limit: Option<u32>) -> i64 {
        let bound = self
            .occupants
            .iter()
            .map(|&(_, limit)| limit)
            .chain(candidate_limit)
            .min();
        match bound {
            Some(limit) => i64::from(limit) - self.occupants.len() as i64,
            None => i64::MAX,
        }
    }

    pub(crate) fn occupy(&mut self, var: VarId, limit: u32) {
        self.occupants.push((var, limit));
    }

    /// Removes `var` from the occupants. Returns `false` (and logs) if it was
    /// not there.
    pub(crate) fn vacate(&mut self, var: VarId) -> bool {
        match self.occupants.iter().rposition(|&(v, _)| v == var) {
            Some(i) => {
                self.occupants.remove(i);
                true
            }
            None => {
                warn!("variable {var} is not assigned to slot {}", self.time);
                false
            }
        }
    }

    /// The slot starting exactly one hour after this one, if the board has it.
    pub fn successor(&self, slots: &SlotTable) -> Option<SlotId> {
        slots.find(self.time + TimeDelta::hours(1))
    }
}

impl Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:[", self.time)?;
        for (i, (var, _)) in self.occupants.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{var}")?;
        }
        write!(f, "]")
    }
}

/// Arena of all slots of a board, in chronological order.
#[derive(Debug, Clone, Default)]
pub struct SlotTable {
    slots: Vec<Slot>,
    by_time: HashMap<NaiveDateTime, SlotId>,
}

impl SlotTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a slot. Callers push in chronological order.
    pub(crate) fn push(&mut self, time: NaiveDateTime, position: (usize, usize)) -> SlotId {
        debug_assert!(
            self.slots.last().map_or(true, |last| last.time < time),
            "slots must be pushed in chronological order"
        );
        let id = SlotId(self.slots.len());
        self.slots.push(Slot::new(time, position));
        self.by_time.insert(time, id);
        id
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, id: SlotId) -> Option<&Slot> {
        self.slots.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: SlotId) -> &mut Slot {
        &mut self.slots[id.0]
    }

    /// Finds the slot starting at exactly `time`.
    pub fn find(&self, time: NaiveDateTime) -> Option<SlotId> {
        self.by_time.get(&time).copied()
    }

    pub fn successor(&self, id: SlotId) -> Option<SlotId> {
        self[id].successor(self)
    }

    /// `len` slots starting at `first`, each one hour after the previous.
    ///
    /// Returns `None` if the run leaves the board or crosses a non-slot cell.
    pub fn span_from(&self, first: SlotId, len: u32) -> Option<Box<[SlotId]>> {
        if len == 0 || first.0 >= self.slots.len() {
            return None;
        }
        let mut span = Vec::with_capacity(len as usize);
        span.push(first);
        let mut current = first;
        for _ in 1..len {
            current = self.successor(current)?;
            span.push(current);
        }
        Some(span.into_boxed_slice())
    }

    pub fn ids(&self) -> impl Iterator<Item = SlotId> {
        (0..self.slots.len()).map(SlotId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &Slot)> {
        self.slots.iter().enumerate().map(|(i, s)| (SlotId(i), s))
    }
}

impl Index<SlotId> for SlotTable {
    type Output = Slot;

    fn index(&self, id: SlotId) -> &Slot {
        &self.slots[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::at;

    fn table(times: &[(i64, u32)]) -> SlotTable {
        let mut t = SlotTable::new();
        for (i, &(day, hour)) in times.iter().enumerate() {
            t.push(at(day, hour), (day as usize, i));
        }
        t
    }

    #[test]
    fn empty_slot_takes_candidate_limit() {
        let slot = Slot::new(at(0, 6), (0, 0));
        assert_eq!(slot.capacity(Some(2)), 2);
        assert_eq!(slot.capacity(None), i64::MAX);
    }

    #[test]
    fn capacity_uses_smallest_limit() {
        let mut slot = Slot::new(at(0, 6), (0, 0));
        slot.occupy(VarId(0), 3);
        assert_eq!(slot.capacity(Some(3)), 2);
        // A stricter candidate shrinks the room for everyone.
        assert_eq!(slot.capacity(Some(1)), 0);
        slot.occupy(VarId(1), 2);
        assert_eq!(slot.capacity(None), 0);
        assert_eq!(slot.capacity(Some(5)), 0);
    }

    #[test]
    fn vacate_restores_capacity() {
        let mut slot = Slot::new(at(0, 6), (0, 0));
        slot.occupy(VarId(0), 1);
        assert_eq!(slot.capacity(Some(1)), 0);
        assert!(slot.vacate(VarId(0)));
        assert_eq!(slot.capacity(Some(1)), 1);
        assert_eq!(slot.occupant_count(), 0);
    }

    #[test]
    fn vacate_of_stranger_is_reported_not_fatal() {
        let mut slot = Slot::new(at(0, 6), (0, 0));
        slot.occupy(VarId(0), 2);
        assert!(!slot.vacate(VarId(7)));
        assert!(slot.is_occupied_by(VarId(0)));
    }

    #[test]
    fn successor_is_exactly_one_hour_later() {
        let t = table(&[(0, 6), (0, 7), (0, 9), (1, 6)]);
        assert_eq!(t.successor(SlotId(0)), Some(SlotId(1)));
        // 08:00 is not a slot (fixed cell), so 07:00 has no successor.
        assert_eq!(t.successor(SlotId(1)), None);
        // Day boundaries do not wrap.
        assert_eq!(t.successor(SlotId(2)), None);
        assert_eq!(t.successor(SlotId(3)), None);
    }

    #[test]
    fn span_from_requires_contiguous_time() {
        let t = table(&[(0, 6), (0, 7), (0, 8), (0, 10)]);
        assert_eq!(
            t.span_from(SlotId(0), 3).as_deref(),
            Some(&[SlotId(0), SlotId(1), SlotId(2)][..])
        );
        assert!(t.span_from(SlotId(1), 3).is_none());
        assert!(t.span_from(SlotId(3), 2).is_none());
        assert!(t.span_from(SlotId(0), 0).is_none());
    }

    #[test]
    fn find_by_timestamp() {
        let t = table(&[(0, 6), (1, 8)]);
        assert_eq!(t.find(at(1, 8)), Some(SlotId(1)));
        assert_eq!(t.find(at(1, 9)), None);
    }
}
