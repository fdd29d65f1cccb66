//! Size-gated flat extraction from the spanning tree.

use super::disjoint_set::DisjointSet;
use super::mst::Edge;
use crate::core::RawCluster;

/// Turn the spanning tree into flat clusters of at least `min_cluster_size`
/// items.
///
/// Edges are visited heaviest first (equal weights keep tree order). An edge
/// joins its two components only when both are still smaller than
/// `min_cluster_size`; a component that has reached the minimum never grows
/// through this rule. Components left below the minimum are noise and are
/// dropped.
///
/// A join attaches the `from` side under the `to` side, and the component
/// keeps the `to` side's label. Survivors are numbered from 0 by ascending
/// label, which is not necessarily the order of their smallest members.
///
/// Because both sides must be below the minimum, no cluster can exceed
/// `2 * (min_cluster_size - 1)` items.
pub fn extract_clusters(mst: &[Edge], n: usize, min_cluster_size: usize) -> Vec<RawCluster> {
    let mut edges = mst.to_vec();
    edges.sort_by(|a, b| b.weight.total_cmp(&a.weight));

    let mut components = DisjointSet::new(n);
    for edge in &edges {
        let root_from = components.find(edge.from);
        let root_to = components.find(edge.to);
        if root_from == root_to {
            continue;
        }

        if components.component_size(root_from) < min_cluster_size
            && components.component_size(root_to) < min_cluster_size
        {
            components.union(root_from, root_to);
        }
    }

    components
        .components()
        .into_iter()
        .filter(|indices| indices.len() >= min_cluster_size)
        .enumerate()
        .map(|(id, indices)| RawCluster { id, indices })
        .collect()
}
