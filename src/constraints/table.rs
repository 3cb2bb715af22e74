//! Extensional constraints: the relation is its list of satisfying tuples.

use std::collections::HashMap;

/// A constraint given by every tuple of domain-value indices that satisfies it.
///
/// Tuples are in scope order. A support index maps each `(position, value)`
/// to the tuples carrying `value` at `position`, so support queries only walk
/// the tuples that could possibly match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableConstraint {
    arity: usize,
    tuples: Vec<Box<[usize]>>,
    supports: HashMap<(usize, usize), Vec<usize>>,
}

impl TableConstraint {
    pub fn new(arity: usize) -> Self {
        Self {
            arity,
            tuples: Vec::new(),
            supports: HashMap::new(),
        }
    }

    pub fn from_tuples(arity: usize, tuples: impl IntoIterator<Item = Vec<usize>>) -> Self {
        let mut table = Self::new(arity);
        for tuple in tuples {
            table.add_tuple(tuple);
        }
        table
    }

    /// Adds a satisfying tuple.
    ///
    /// # Panics
    ///
    /// Panics if the tuple length differs from the arity.
    pub fn add_tuple(&mut self, tuple: impl Into<Box<[usize]>>) {
        let tuple = tuple.into();
        assert_eq!(tuple.len(), self.arity, "tuple arity mismatch");
        let index = self.tuples.len();
        for (position, &value) in tuple.iter().enumerate() {
            self.supports
                .entry((position, value))
                .or_default()
                .push(index);
        }
        self.tuples.push(tuple);
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    pub fn tuples(&self) -> impl Iterator<Item = &[usize]> {
        self.tuples.iter().map(|t| &**t)
    }

    /// Whether `values` is one of the satisfying tuples.
    pub fn contains(&self, values: &[usize]) -> bool {
        if values.len() != self.arity || values.is_empty() {
            return false;
        }
        self.supports
            .get(&(0, values[0]))
            .is_some_and(|ids| ids.iter().any(|&i| *self.tuples[i] == *values))
    }

    /// Whether some satisfying tuple has `value` at `position` and, at every
    /// other position, a value accepted by `in_domain(position, value)`.
    pub fn has_support(
        &self,
        position: usize,
        value: usize,
        mut in_domain: impl FnMut(usize, usize) -> bool,
    ) -> bool {
        let Some(ids) = self.supports.get(&(position, value)) else {
            return false;
        };
        ids.iter().any(|&i| {
            self.tuples[i]
                .iter()
                .enumerate()
                .all(|(p, &v)| p == position || in_domain(p, v))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn not_equal_2x3() -> TableConstraint {
        let tuples = (0..3)
            .flat_map(|a| (0..3).map(move |b| vec![a, b]))
            .filter(|t| t[0] != t[1]);
        TableConstraint::from_tuples(2, tuples)
    }

    #[test]
    fn contains_only_listed_tuples() {
        let table = not_equal_2x3();
        assert_eq!(table.len(), 6);
        assert!(table.contains(&[0, 1]));
        assert!(!table.contains(&[2, 2]));
        assert!(!table.contains(&[0]));
    }

    #[test]
    fn support_follows_other_domains() {
        let table = not_equal_2x3();
        // Second variable reduced to {1}: first variable's value 1 loses support.
        let in_domain = |p: usize, v: usize| p != 1 || v == 1;
        assert!(table.has_support(0, 0, in_domain));
        assert!(!table.has_support(0, 1, in_domain));
        assert!(table.has_support(0, 2, in_domain));
    }

    #[test]
    fn value_absent_from_table_has_no_support() {
        let table = TableConstraint::from_tuples(2, [vec![0, 1]]);
        assert!(!table.has_support(0, 5, |_, _| true));
    }

    #[test]
    fn empty_table_supports_nothing() {
        let table = TableConstraint::new(3);
        assert!(table.is_empty());
        assert!(!table.has_support(1, 0, |_, _| true));
        assert!(!table.contains(&[0, 0, 0]));
    }

    #[test]
    #[should_panic(expected = "tuple arity mismatch")]
    fn wrong_arity_panics() {
        let mut table = TableConstraint::new(2);
        table.add_tuple(vec![1, 2, 3]);
    }
}
