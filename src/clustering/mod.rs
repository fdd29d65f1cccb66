//! HDBSCAN-inspired density clustering over embedding vectors.
//!
//! The engine is built from four primitives, run in order:
//!
//! 1. [`DistanceMatrix`]: exact pairwise Euclidean distances
//! 2. [`core_distances`]: distance to the k-th nearest neighbor
//! 3. [`build_mst`]: minimum spanning tree over mutual reachability
//! 4. [`extract_clusters`]: size-gated flat extraction
//!
//! Everything is synchronous, single-threaded and deterministic: the same
//! embeddings in the same order with the same parameters always produce the
//! same clusters.
//!
//! ## Input size
//!
//! Distances are computed exactly. The matrix needs n² floats and the
//! spanning tree sorts n(n-1)/2 candidate edges, so runs above roughly
//! [`RECOMMENDED_MAX_ITEMS`] become slow and memory hungry. Larger inputs
//! are still processed; a warning is logged.

mod core_distance;
mod disjoint_set;
mod distance;
mod extract;
mod mst;

pub use core_distance::core_distances;
pub use disjoint_set::DisjointSet;
pub use distance::{euclidean_distance, DistanceMatrix};
pub use extract::extract_clusters;
pub use mst::{build_mst, mutual_reachability, Edge};

use crate::core::RawCluster;
use crate::errors::ClusterError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span, warn};

/// Item count above which the O(n²) stages become impractical.
pub const RECOMMENDED_MAX_ITEMS: usize = 20_000;

/// Default minimum cluster size.
pub const DEFAULT_MIN_CLUSTER_SIZE: usize = 5;

/// Parameters of the density clusterer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusteringParams {
    /// Neighbor rank for core distances and the smallest surviving cluster.
    #[serde(default = "default_min_cluster_size")]
    pub min_cluster_size: usize,
}

impl Default for ClusteringParams {
    fn default() -> Self {
        Self {
            min_cluster_size: default_min_cluster_size(),
        }
    }
}

impl ClusteringParams {
    pub fn with_min_cluster_size(mut self, size: usize) -> Self {
        self.min_cluster_size = size;
        self
    }

    /// # Errors
    ///
    /// [`ClusterError::InvalidParameter`] if `min_cluster_size` is zero.
    pub fn validate(&self) -> Result<(), ClusterError> {
        if self.min_cluster_size < 1 {
            return Err(ClusterError::invalid_parameter(
                "min_cluster_size",
                format!("must be at least 1, got {}", self.min_cluster_size),
            ));
        }
        Ok(())
    }
}

fn default_min_cluster_size() -> usize {
    DEFAULT_MIN_CLUSTER_SIZE
}

/// Runs the four clustering stages over a set of embeddings.
#[derive(Debug, Clone, Default)]
pub struct DensityClusterer {
    params: ClusteringParams,
}

impl DensityClusterer {
    pub fn new(params: ClusteringParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ClusteringParams {
        &self.params
    }

    /// Cluster the embeddings, returning clusters of item indices.
    ///
    /// Items that end up in no cluster are noise. An empty input, or a
    /// minimum size that no component reaches, yields an empty vector.
    ///
    /// # Errors
    ///
    /// - [`ClusterError::InvalidParameter`] for a zero minimum size
    /// - [`ClusterError::DimensionMismatch`] when embeddings differ in length
    /// - [`ClusterError::NonFiniteEmbedding`] for NaN or infinite values
    pub fn fit<E: AsRef<[f64]>>(&self, embeddings: &[E]) -> Result<Vec<RawCluster>, ClusterError> {
        self.params.validate()?;
        let n = embeddings.len();
        let min_cluster_size = self.params.min_cluster_size;

        let _span = info_span!("density_clustering", items = n, min_cluster_size).entered();

        if n > RECOMMENDED_MAX_ITEMS {
            warn!(
                items = n,
                limit = RECOMMENDED_MAX_ITEMS,
                "Input exceeds the recommended size for exact O(n^2) clustering"
            );
        }
        if min_cluster_size > n && n > 0 {
            warn!(
                items = n,
                min_cluster_size, "Minimum cluster size exceeds item count; no cluster can form"
            );
        }

        let matrix = DistanceMatrix::from_embeddings(embeddings)?;
        let core = core_distances(&matrix, min_cluster_size);
        let tree = build_mst(&matrix, &core);
        debug!(edges = tree.len(), "Built mutual reachability spanning tree");

        let clusters = extract_clusters(&tree, n, min_cluster_size);
        let clustered: usize = clusters.iter().map(RawCluster::len).sum();
        debug!(
            clusters = clusters.len(),
            clustered,
            noise = n - clustered,
            "Extracted flat clusters"
        );

        Ok(clusters)
    }
}
