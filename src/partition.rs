use std::collections::BTreeMap;

use petgraph::unionfind::UnionFind;
use serde::{Serialize, Serializer};

/// Disjoint subsets over the elements `0..len`, kept in a petgraph
/// `UnionFind`. Elements only join the partition through [`Partition::insert`];
/// the rest (for example deleted graph nodes) carry no subset.
#[derive(Debug, Clone)]
pub struct Partition {
    sets: UnionFind<usize>,
    assigned: Vec<bool>,
}

impl Partition {
    pub fn new(len: usize) -> Self {
        Self {
            sets: UnionFind::new(len),
            assigned: vec![false; len],
        }
    }

    /// Add `element` as a singleton. Elements already present keep their subset.
    pub fn insert(&mut self, element: usize) {
        if let Some(slot) = self.assigned.get_mut(element) {
            *slot = true;
        }
    }

    /// Join the subsets of `a` and `b`. Returns `false` when either element is
    /// not in the partition or both already share a subset.
    pub fn merge(&mut self, a: usize, b: usize) -> bool {
        if !self.contains(a) || !self.contains(b) {
            return false;
        }
        self.sets.union(a, b)
    }

    pub fn contains(&self, element: usize) -> bool {
        self.assigned.get(element).copied().unwrap_or(false)
    }

    /// Representative element of the subset holding `element`.
    pub fn subset_of(&self, element: usize) -> Option<usize> {
        self.contains(element).then(|| self.sets.find(element))
    }

    pub fn in_same_subset(&self, a: usize, b: usize) -> bool {
        matches!((self.subset_of(a), self.subset_of(b)), (Some(x), Some(y)) if x == y)
    }

    /// Number of elements covered, assigned or not.
    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }

    pub fn number_of_subsets(&self) -> usize {
        self.subset_sizes().len()
    }

    /// Subset id to member count, ordered by subset id.
    pub fn subset_sizes(&self) -> BTreeMap<usize, usize> {
        let mut sizes = BTreeMap::new();
        for subset in (0..self.len()).filter_map(|element| self.subset_of(element)) {
            *sizes.entry(subset).or_insert(0) += 1;
        }
        sizes
    }
}

impl Serialize for Partition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq((0..self.len()).map(|element| self.subset_of(element)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_joins_subsets() {
        let mut partition = Partition::new(4);
        for element in 0..4 {
            partition.insert(element);
        }
        assert_eq!(partition.number_of_subsets(), 4);

        assert!(partition.merge(2, 0));
        assert!(partition.merge(3, 2));
        assert!(!partition.merge(0, 3));
        assert!(partition.in_same_subset(0, 3));
        assert!(!partition.in_same_subset(0, 1));
        assert_eq!(partition.number_of_subsets(), 2);

        let root = partition.subset_of(0).expect("assigned");
        assert_eq!(partition.subset_sizes().get(&root), Some(&3));
    }

    #[test]
    fn unassigned_elements_have_no_subset() {
        let mut partition = Partition::new(3);
        partition.insert(1);
        assert_eq!(partition.len(), 3);
        assert_eq!(partition.subset_of(0), None);
        assert_eq!(partition.subset_of(7), None);
        assert!(!partition.merge(0, 1));
        assert!(!partition.merge(1, 7));
        assert!(!partition.in_same_subset(0, 2));
        assert_eq!(partition.number_of_subsets(), 1);

        let json = serde_json::to_string(&partition).expect("serialize");
        assert_eq!(json, "[null,1,null]");
    }
}
