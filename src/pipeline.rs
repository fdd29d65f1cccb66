//! End-to-end grouping: cluster, name, merge.
//!
//! Items are processed in canonical order (stable sort by id) so that the
//! partition, the generated names and the record order do not depend on the
//! order in which a caller happened to supply the items. Within a cluster,
//! members are listed in that same canonical order.

use crate::clustering::{ClusteringParams, DensityClusterer};
use crate::core::{ClusterRecord, Item, NamedCluster};
use crate::errors::ClusterError;
use crate::merge::{merge_clusters, rank_by_size};
use crate::naming::ClusterNamer;
use crate::observability::{set_phase, RunPhase};
use serde::Serialize;
use std::cmp::Ordering;
use tracing::{debug, info, info_span};

/// Counts describing one grouping run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ClusterStats {
    pub input_items: usize,
    pub clustered_items: usize,
    pub noise_items: usize,
    pub clusters: usize,
    pub merged_clusters: usize,
}

impl ClusterStats {
    /// Percentage by which `output_rows` shrinks the input.
    pub fn reduction_percent(&self, output_rows: usize) -> f64 {
        if self.input_items == 0 {
            return 0.0;
        }
        (1.0 - output_rows as f64 / self.input_items as f64) * 100.0
    }
}

/// Result of a grouping run.
///
/// An empty report is a normal outcome (empty input, or every item ended up
/// as noise); check [`ClusterReport::has_clusters`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ClusterReport {
    /// Clusters before merging; `id` is the extraction id plus one, listed
    /// largest first.
    pub clusters: Vec<NamedCluster>,
    /// Clusters after merging equal names, numbered from 1 by size.
    pub merged: Vec<NamedCluster>,
    pub stats: ClusterStats,
}

impl ClusterReport {
    pub fn has_clusters(&self) -> bool {
        !self.clusters.is_empty()
    }

    pub fn cluster_records(&self) -> Vec<ClusterRecord> {
        self.clusters.iter().map(ClusterRecord::from).collect()
    }

    pub fn merged_records(&self) -> Vec<ClusterRecord> {
        self.merged.iter().map(ClusterRecord::from).collect()
    }
}

/// Clusters items, names the clusters and merges equal names.
#[derive(Debug, Clone, Default)]
pub struct GroupingPipeline {
    clusterer: DensityClusterer,
    namer: ClusterNamer,
}

impl GroupingPipeline {
    pub fn new(params: ClusteringParams, namer: ClusterNamer) -> Self {
        Self {
            clusterer: DensityClusterer::new(params),
            namer,
        }
    }

    pub fn params(&self) -> &ClusteringParams {
        self.clusterer.params()
    }

    /// Group `items`. The report does not depend on the order of `items`;
    /// repeated ids are ordered by name and then embedding values.
    ///
    /// # Errors
    ///
    /// Propagates [`ClusterError`] from validation; nothing is computed when
    /// the parameters or embeddings are invalid.
    pub fn run(&self, items: &[Item]) -> Result<ClusterReport, ClusterError> {
        let _span = info_span!("grouping", items = items.len()).entered();

        let order = canonical_order(items);
        let embeddings: Vec<&[f64]> = order
            .iter()
            .map(|&index| items[index].embedding.as_slice())
            .collect();

        let raw = self.clusterer.fit(&embeddings)?;

        let _phase = set_phase(RunPhase::Naming);
        let named: Vec<NamedCluster> = raw
            .iter()
            .map(|cluster| {
                let members: Vec<&Item> = cluster
                    .indices
                    .iter()
                    .map(|&position| &items[order[position]])
                    .collect();
                let names: Vec<&str> = members.iter().map(|item| item.name.as_str()).collect();
                NamedCluster {
                    id: cluster.id + 1,
                    name: self.namer.name(&names),
                    members: members.iter().map(|item| item.member()).collect(),
                }
            })
            .collect();
        debug!(clusters = named.len(), "Named clusters");

        let merged = merge_clusters(named.clone());
        let mut clusters = named;
        rank_by_size(&mut clusters);

        let clustered_items: usize = clusters.iter().map(NamedCluster::len).sum();
        let stats = ClusterStats {
            input_items: items.len(),
            clustered_items,
            noise_items: items.len() - clustered_items,
            clusters: clusters.len(),
            merged_clusters: merged.len(),
        };
        info!(
            clusters = stats.clusters,
            merged = stats.merged_clusters,
            noise = stats.noise_items,
            "Grouping complete"
        );

        Ok(ClusterReport {
            clusters,
            merged,
            stats,
        })
    }
}

/// Item indices sorted by id, then name, then embedding values.
///
/// Ids are normally unique; the later keys only order repeated ids, so
/// items that still compare equal are interchangeable in the output.
fn canonical_order(items: &[Item]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| {
        let (a, b) = (&items[a], &items[b]);
        a.id.cmp(&b.id)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| compare_embeddings(&a.embedding, &b.embedding))
    });
    order
}

fn compare_embeddings(a: &[f64], b: &[f64]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| x.total_cmp(y))
        .find(|ordering| ordering.is_ne())
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}
