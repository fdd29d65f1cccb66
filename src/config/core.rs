use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::retry::RetryConfig;
use crate::clustering::ClusteringParams;
use crate::naming::CategoryTable;

/// Root configuration structure for densegroup
///
/// Every section and field has a default, so an empty `.densegroup.toml`
/// is a valid configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DensegroupConfig {
    /// Clustering parameters
    #[serde(default)]
    pub clustering: ClusteringParams,

    /// Category table override for cluster naming
    #[serde(default)]
    pub naming: NamingConfig,

    /// Embedding acquisition settings
    #[serde(default)]
    pub ingest: IngestConfig,

    /// Backoff schedule for rate-limited embedding calls
    #[serde(default)]
    pub retry: RetryConfig,

    /// Vector store location
    #[serde(default)]
    pub store: StoreConfig,

    /// Output files and format
    #[serde(default)]
    pub output: OutputConfig,
}

impl DensegroupConfig {
    /// Category table to name clusters with: the configured one, or the
    /// built-in table.
    pub fn category_table(&self) -> CategoryTable {
        self.naming.categories.clone().unwrap_or_default()
    }
}

/// Naming configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct NamingConfig {
    /// Replaces the built-in category table when present. Order is the
    /// tie-break order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<CategoryTable>,
}

/// Embedding pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngestConfig {
    /// Texts per batch (default: 100)
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Maximum embedding calls in flight (default: 16)
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Save a checkpoint every N batches (default: 1)
    #[serde(default = "default_checkpoint_every")]
    pub checkpoint_every: usize,

    /// Pause between batches in milliseconds (default: 100)
    #[serde(default = "default_batch_delay_ms")]
    pub batch_delay_ms: u64,

    /// Output dimensionality of the built-in hashing embedder (default: 256)
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            concurrency: default_concurrency(),
            checkpoint_every: default_checkpoint_every(),
            batch_delay_ms: default_batch_delay_ms(),
            dimensions: default_dimensions(),
        }
    }
}

/// Vector store settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreConfig {
    /// Directory holding collections and checkpoints (default: .densegroup)
    #[serde(default = "default_store_dir")]
    pub dir: PathBuf,

    /// Collection name (default: embeddings)
    #[serde(default = "default_collection")]
    pub collection: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: default_store_dir(),
            collection: default_collection(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    /// Pre-merge records (default: clustered_output.csv)
    #[serde(default = "default_clustered_file")]
    pub clustered_file: String,

    /// Merged records (default: merged_clustered_output.csv)
    #[serde(default = "default_merged_file")]
    pub merged_file: String,

    #[serde(default)]
    pub format: crate::io::OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            clustered_file: default_clustered_file(),
            merged_file: default_merged_file(),
            format: crate::io::OutputFormat::default(),
        }
    }
}

fn default_batch_size() -> usize {
    100
}

fn default_concurrency() -> usize {
    16
}

fn default_checkpoint_every() -> usize {
    1
}

fn default_batch_delay_ms() -> u64 {
    100
}

fn default_dimensions() -> usize {
    256
}

fn default_store_dir() -> PathBuf {
    PathBuf::from(".densegroup")
}

fn default_collection() -> String {
    "embeddings".to_string()
}

fn default_clustered_file() -> String {
    "clustered_output.csv".to_string()
}

fn default_merged_file() -> String {
    "merged_clustered_output.csv".to_string()
}
