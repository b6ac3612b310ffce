use std::collections::BTreeSet;
use std::ops::{BitAnd, BitOr, Sub};

use serde::{Deserialize, Serialize};

/// Positions into a category's `cycle_times`, used to tag cycles without
/// copying their durations. Serialized as a plain list; order on the wire
/// carries no meaning and duplicates collapse on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexSet(BTreeSet<usize>);

impl IndexSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every position of a sequence with `len` entries.
    pub fn all(len: usize) -> Self {
        Self((0..len).collect())
    }

    pub fn insert(&mut self, index: usize) -> bool {
        self.0.insert(index)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    pub fn max(&self) -> Option<usize> {
        self.0.last().copied()
    }

    pub fn and(&self, other: &IndexSet) -> IndexSet {
        Self(self.0.intersection(&other.0).copied().collect())
    }

    pub fn or(&self, other: &IndexSet) -> IndexSet {
        Self(self.0.union(&other.0).copied().collect())
    }

    pub fn minus(&self, other: &IndexSet) -> IndexSet {
        Self(self.0.difference(&other.0).copied().collect())
    }

    pub fn is_disjoint(&self, other: &IndexSet) -> bool {
        self.0.is_disjoint(&other.0)
    }

    /// Values of `times` at the tagged positions, ascending by position.
    /// Positions past the end are skipped.
    pub fn pick(&self, times: &[f64]) -> Vec<f64> {
        self.iter().filter_map(|i| times.get(i).copied()).collect()
    }

    pub fn sum_of(&self, times: &[f64]) -> f64 {
        self.iter().filter_map(|i| times.get(i)).sum()
    }
}

impl FromIterator<usize> for IndexSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[usize; N]> for IndexSet {
    fn from(items: [usize; N]) -> Self {
        items.into_iter().collect()
    }
}

impl BitAnd for &IndexSet {
    type Output = IndexSet;

    fn bitand(self, rhs: &IndexSet) -> IndexSet {
        self.and(rhs)
    }
}

impl BitOr for &IndexSet {
    type Output = IndexSet;

    fn bitor(self, rhs: &IndexSet) -> IndexSet {
        self.or(rhs)
    }
}

impl Sub for &IndexSet {
    type Output = IndexSet;

    fn sub(self, rhs: &IndexSet) -> IndexSet {
        self.minus(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::IndexSet;

    #[test]
    fn algebra_matches_set_semantics() {
        let a = IndexSet::from([0, 1, 2, 5]);
        let b = IndexSet::from([1, 2, 3]);
        assert_eq!(&a & &b, IndexSet::from([1, 2]));
        assert_eq!(&a | &b, IndexSet::from([0, 1, 2, 3, 5]));
        assert_eq!(&a - &b, IndexSet::from([0, 5]));
        assert_eq!(&IndexSet::all(3) - &IndexSet::from([1]), IndexSet::from([0, 2]));
    }

    #[test]
    fn deserializes_unordered_lists_with_duplicates() {
        let set: IndexSet = serde_json::from_str("[4, 0, 4, 2]").unwrap();
        assert_eq!(set, IndexSet::from([0, 2, 4]));
        assert_eq!(serde_json::to_string(&set).unwrap(), "[0,2,4]");
    }

    #[test]
    fn pick_skips_out_of_range_positions() {
        let set = IndexSet::from([0, 2, 9]);
        assert_eq!(set.pick(&[1.5, 2.0, 3.5]), vec![1.5, 3.5]);
        assert!((set.sum_of(&[1.5, 2.0, 3.5]) - 5.0).abs() < 1e-9);
    }
}
