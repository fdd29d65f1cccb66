//! Disjoint-set with component sizes.
//!
//! Wraps `petgraph`'s union-find (union by rank, iterative path halving, so
//! long chains never recurse) and keeps the size of every component at its
//! current root.
//!
//! Each component also carries a *label*: the element that names it. A
//! union always keeps the label of its second argument, independent of
//! which root the rank heuristic picks, so the label is the root a plain
//! "attach `a` under `b`" forest would have.

use petgraph::unionfind::UnionFind;

#[derive(Debug, Clone)]
pub struct DisjointSet {
    sets: UnionFind<usize>,
    sizes: Vec<usize>,
    labels: Vec<usize>,
}

impl DisjointSet {
    /// `n` singleton components.
    pub fn new(n: usize) -> Self {
        Self {
            sets: UnionFind::new(n),
            sizes: vec![1; n],
            labels: (0..n).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Representative of the component containing `x`.
    pub fn find(&mut self, x: usize) -> usize {
        self.sets.find_mut(x)
    }

    /// Number of elements in the component containing `x`.
    pub fn component_size(&mut self, x: usize) -> usize {
        let root = self.find(x);
        self.sizes[root]
    }

    /// Label of the component containing `x`.
    pub fn label(&mut self, x: usize) -> usize {
        let root = self.find(x);
        self.labels[root]
    }

    /// Merge the component of `a` into that of `b`; the merged component
    /// keeps `b`'s label. Returns `false` if they were already joined.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return false;
        }

        let merged = self.sizes[root_a] + self.sizes[root_b];
        let label = self.labels[root_b];
        self.sets.union(root_a, root_b);
        let root = self.find(root_a);
        self.sizes[root] = merged;
        self.labels[root] = label;
        true
    }

    /// All components ordered by ascending label, each listing its
    /// elements ascending.
    pub fn components(&mut self) -> Vec<Vec<usize>> {
        let n = self.len();
        let mut by_label: Vec<Vec<usize>> = vec![Vec::new(); n];
        for x in 0..n {
            let label = self.label(x);
            by_label[label].push(x);
        }
        by_label.retain(|members| !members.is_empty());
        by_label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_tracks_sizes() {
        let mut set = DisjointSet::new(5);
        assert!(set.union(0, 1));
        assert!(set.union(3, 4));
        assert!(set.union(1, 4));
        assert!(!set.union(0, 3));

        assert_eq!(set.component_size(0), 4);
        assert_eq!(set.component_size(4), 4);
        assert_eq!(set.component_size(2), 1);
        assert_eq!(set.find(0), set.find(3));
    }

    #[test]
    fn test_components_ordered_by_label() {
        let mut set = DisjointSet::new(6);
        set.union(5, 2);
        set.union(1, 4);
        set.union(4, 3);

        // Labels: {0} -> 0, {2,5} -> 2, {1,3,4} -> 3
        assert_eq!(
            set.components(),
            vec![vec![0], vec![2, 5], vec![1, 3, 4]]
        );
    }

    #[test]
    fn test_union_keeps_label_of_second_component() {
        let mut set = DisjointSet::new(5);
        // Grow {0,1,2} so rank favors its root, then attach it under 4
        set.union(0, 1);
        set.union(2, 1);
        set.union(1, 4);

        assert_eq!(set.label(0), 4);
        assert_eq!(set.label(2), 4);
        assert_eq!(set.label(3), 3);
        assert_eq!(set.component_size(4), 4);
    }

    #[test]
    fn test_long_chain_does_not_overflow() {
        let n = 200_000;
        let mut set = DisjointSet::new(n);
        for i in 1..n {
            set.union(i - 1, i);
        }
        assert_eq!(set.component_size(0), n);
        assert_eq!(set.components().len(), 1);
    }

    #[test]
    fn test_empty_set() {
        let mut set = DisjointSet::new(0);
        assert!(set.is_empty());
        assert!(set.components().is_empty());
    }
}
