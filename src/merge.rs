//! Coalescing of clusters that received the same name.

use crate::core::NamedCluster;
use std::collections::HashMap;

/// Key under which cluster names collide.
pub fn merge_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Merge clusters whose names normalize to the same key.
///
/// The first cluster seen for a key keeps its display name, and members of
/// later clusters with that key are appended in order. Members are not
/// deduplicated. The merged clusters are then ranked by member count,
/// largest first (equal counts keep first-seen order), and numbered from 1.
pub fn merge_clusters(clusters: Vec<NamedCluster>) -> Vec<NamedCluster> {
    let mut slot_of_key: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<NamedCluster> = Vec::new();

    for cluster in clusters {
        let key = merge_key(&cluster.name);
        if let Some(&slot) = slot_of_key.get(&key) {
            merged[slot].members.extend(cluster.members);
        } else {
            slot_of_key.insert(key, merged.len());
            merged.push(cluster);
        }
    }

    rank_by_size(&mut merged);
    for (index, cluster) in merged.iter_mut().enumerate() {
        cluster.id = index + 1;
    }
    merged
}

/// Stable sort, largest cluster first.
pub fn rank_by_size(clusters: &mut [NamedCluster]) {
    clusters.sort_by_key(|c| std::cmp::Reverse(c.members.len()));
}
