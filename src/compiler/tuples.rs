//! Exhaustive enumeration of the satisfying tuples of a predicate.
//!
//! The result is exactly the filtered cross product of the domains; partial
//! tuples that can no longer succeed are cut off early so that only the
//! satisfying part of the product is ever materialised.

use crate::constraints::Predicate;
use crate::model::{SlotId, SlotTable, Span};

/// Every tuple of value indices (one per domain, in order) satisfying `predicate`.
pub(crate) fn satisfying_tuples(
    predicate: Predicate,
    domains: &[&[Span]],
    slots: &SlotTable,
) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    match predicate {
        Predicate::Disjoint => {
            let mut indices = Vec::with_capacity(domains.len());
            let mut spans = Vec::with_capacity(domains.len());
            extend(predicate, domains, slots, &mut indices, &mut spans, &mut out);
        }
        Predicate::Precedes => precedence_tuples(domains, slots, &mut out),
    }
    out
}

fn extend<'a>(
    predicate: Predicate,
    domains: &[&'a [Span]],
    slots: &SlotTable,
    indices: &mut Vec<usize>,
    spans: &mut Vec<&'a [SlotId]>,
    out: &mut Vec<Vec<usize>>,
) {
    let position = indices.len();
    if position == domains.len() {
        out.push(indices.clone());
        return;
    }
    for (value, span) in domains[position].iter().enumerate() {
        spans.push(span);
        if predicate.admits_prefix(spans, domains.len(), slots) {
            indices.push(value);
            extend(predicate, domains, slots, indices, spans, out);
            indices.pop();
        }
        spans.pop();
    }
}

/// For each dependent value, the product of the prerequisite values that end
/// before it starts.
fn precedence_tuples(domains: &[&[Span]], slots: &SlotTable, out: &mut Vec<Vec<usize>>) {
    let Some((dependent, prerequisites)) = domains.split_last() else {
        return;
    };
    for (d, dep_span) in dependent.iter().enumerate() {
        let start = slots[dep_span[0]].time();
        let allowed: Vec<Vec<usize>> = prerequisites
            .iter()
            .map(|domain| {
                domain
                    .iter()
                    .enumerate()
                    .filter(|(_, span)| slots[span[span.len() - 1]].time() < start)
                    .map(|(i, _)| i)
                    .collect()
            })
            .collect();
        cartesian(&allowed, &mut Vec::with_capacity(domains.len()), &mut |prefix| {
            let mut tuple = prefix.to_vec();
            tuple.push(d);
            out.push(tuple);
        });
    }
}

fn cartesian(lists: &[Vec<usize>], prefix: &mut Vec<usize>, emit: &mut impl FnMut(&[usize])) {
    let position = prefix.len();
    if position == lists.len() {
        emit(prefix);
        return;
    }
    for &value in &lists[position] {
        prefix.push(value);
        cartesian(lists, prefix, emit);
        prefix.pop();
    }
}
