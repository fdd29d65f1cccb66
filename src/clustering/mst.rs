//! Minimum spanning tree over mutual reachability distances.

use super::disjoint_set::DisjointSet;
use super::distance::DistanceMatrix;

/// Weighted edge between two item indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub weight: f64,
}

/// `max(raw(i, j), core(i), core(j))`.
///
/// Never smaller than the raw distance; pushes sparse points away from
/// dense ones.
pub fn mutual_reachability(matrix: &DistanceMatrix, core: &[f64], i: usize, j: usize) -> f64 {
    matrix.get(i, j).max(core[i]).max(core[j])
}

/// Kruskal's algorithm over the complete mutual reachability graph.
///
/// Candidate edges are generated for every pair `i < j` (i ascending, then
/// j ascending) and stably sorted by weight, so equal weights keep their
/// generation order and the tree is reproducible. Returns `n - 1` edges in
/// acceptance order, or none for `n <= 1`.
///
/// Materializes n(n-1)/2 candidate edges; memory and the O(n² log n) sort
/// bound practical input sizes.
pub fn build_mst(matrix: &DistanceMatrix, core: &[f64]) -> Vec<Edge> {
    let n = matrix.len();
    if n <= 1 {
        return Vec::new();
    }

    let mut candidates = Vec::with_capacity(n * (n - 1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            candidates.push(Edge {
                from: i,
                to: j,
                weight: mutual_reachability(matrix, core, i, j),
            });
        }
    }
    candidates.sort_by(|a, b| a.weight.total_cmp(&b.weight));

    let mut components = DisjointSet::new(n);
    let mut tree = Vec::with_capacity(n - 1);

    for edge in candidates {
        if components.union(edge.from, edge.to) {
            tree.push(edge);
            if tree.len() == n - 1 {
                break;
            }
        }
    }

    tree
}
