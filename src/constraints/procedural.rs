//! Intensional constraints: the relation is decided by a predicate over spans.

use chrono::NaiveDateTime;

use crate::model::{SlotId, SlotTable};

/// The relations the compiler knows how to state over candidate spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Predicate {
    /// No slot appears in more than one span.
    Disjoint,
    /// Every span but the last ends strictly before the last one starts.
    Precedes,
}

impl Predicate {
    /// Decides the relation for a complete tuple of spans (scope order).
    pub fn holds(&self, spans: &[&[SlotId]], slots: &SlotTable) -> bool {
        match self {
            Self::Disjoint => pairwise_disjoint(spans),
            Self::Precedes => match spans.split_last() {
                Some((dependent, before)) => {
                    let start = first_time(dependent, slots);
                    before.iter().all(|s| last_time(s, slots) < start)
                }
                None => true,
            },
        }
    }

    /// Whether a tuple starting with `prefix` can still satisfy the relation.
    ///
    /// Never rejects a prefix of a satisfying tuple.
    pub fn admits_prefix(&self, prefix: &[&[SlotId]], arity: usize, slots: &SlotTable) -> bool {
        match self {
            Self::Disjoint => match prefix.split_last() {
                Some((newest, earlier)) => earlier.iter().all(|s| disjoint(s, newest)),
                None => true,
            },
            Self::Precedes => prefix.len() < arity || self.holds(prefix, slots),
        }
    }

    fn stringify(&self) -> &'static str {
        match self {
            Self::Disjoint => "Disjoint",
            Self::Precedes => "Precedes",
        }
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.stringify())
    }
}

/// A constraint checked by evaluating its [`Predicate`] on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProceduralConstraint {
    predicate: Predicate,
}

impl ProceduralConstraint {
    pub const fn new(predicate: Predicate) -> Self {
        Self { predicate }
    }

    pub const fn predicate(&self) -> Predicate {
        self.predicate
    }

    pub fn check(&self, spans: &[&[SlotId]], slots: &SlotTable) -> bool {
        self.predicate.holds(spans, slots)
    }

    /// Whether `value` at `position` extends to a satisfying tuple, choosing the
    /// other positions from `candidates` (one list of spans per position; the
    /// list at `position` itself is ignored).
    pub fn has_support(
        &self,
        position: usize,
        value: &[SlotId],
        candidates: &[Vec<&[SlotId]>],
        slots: &SlotTable,
    ) -> bool {
        match self.predicate {
            Predicate::Disjoint => {
                let mut chosen = vec![value];
                disjoint_extension(position, 0, candidates, &mut chosen)
            }
            Predicate::Precedes => precedes_support(position, value, candidates, slots),
        }
    }
}

fn first_time(span: &[SlotId], slots: &SlotTable) -> NaiveDateTime {
    slots[span[0]].time()
}

fn last_time(span: &[SlotId], slots: &SlotTable) -> NaiveDateTime {
    slots[span[span.len() - 1]].time()
}

fn disjoint(a: &[SlotId], b: &[SlotId]) -> bool {
    a.iter().all(|s| !b.contains(s))
}

fn pairwise_disjoint(spans: &[&[SlotId]]) -> bool {
    spans
        .iter()
        .enumerate()
        .all(|(i, a)| spans[i + 1..].iter().all(|b| disjoint(a, b)))
}

/// Depth-first search for one span per remaining position, pairwise disjoint
/// with everything already in `chosen`.
fn disjoint_extension<'a>(
    fixed: usize,
    position: usize,
    candidates: &[Vec<&'a [SlotId]>],
    chosen: &mut Vec<&'a [SlotId]>,
) -> bool {
    if position == candidates.len() {
        return true;
    }
    if position == fixed {
        return disjoint_extension(fixed, position + 1, candidates, chosen);
    }
    for &span in &candidates[position] {
        if chosen.iter().all(|c| disjoint(c, span)) {
            chosen.push(span);
            let found = disjoint_extension(fixed, position + 1, candidates, chosen);
            chosen.pop();
            if found {
                return true;
            }
        }
    }
    false
}

/// Precedence decomposes per prerequisite position once the dependent's
/// start is known, so support is a pair of existence checks.
fn precedes_support(
    position: usize,
    value: &[SlotId],
    candidates: &[Vec<&[SlotId]>],
    slots: &SlotTable,
) -> bool {
    let dependent = candidates.len() - 1;
    let others_end_before = |start: NaiveDateTime, skip: usize| {
        (0..dependent)
            .filter(|&q| q != skip)
            .all(|q| candidates[q].iter().any(|s| last_time(s, slots) < start))
    };

    if position == dependent {
        others_end_before(first_time(value, slots), dependent)
    } else {
        let end = last_time(value, slots);
        candidates[dependent].iter().any(|d| {
            let start = first_time(d, slots);
            end < start && others_end_before(start, position)
        })
    }
}
