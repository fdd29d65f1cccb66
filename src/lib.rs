//! Density-based grouping of named items.
//!
//! Items (an id, a display name and an embedding vector) are clustered with
//! an HDBSCAN-inspired engine, each cluster is given a human-readable name
//! from a keyword taxonomy, and clusters that end up with the same name are
//! merged.
//!
//! ```
//! use densegroup::{ClusteringParams, ClusterNamer, GroupingPipeline, Item};
//!
//! let items: Vec<Item> = (0..6)
//!     .map(|i| Item::new(format!("{i}"), "Clinic Nurse", vec![i as f64 * 0.1, 0.0]))
//!     .collect();
//! let pipeline = GroupingPipeline::new(
//!     ClusteringParams::default().with_min_cluster_size(3),
//!     ClusterNamer::default(),
//! );
//! let report = pipeline.run(&items).unwrap();
//! assert!(report.has_clusters());
//! assert!(report.merged.iter().all(|c| c.name == "Medical / Healthcare"));
//! ```

// Export modules for library usage
pub mod cli;
pub mod clustering;
pub mod config;
pub mod core;
pub mod errors;
pub mod ingest;
pub mod io;
pub mod merge;
pub mod naming;
pub mod observability;
pub mod pipeline;
pub mod progress;
pub mod utils;

// Re-export commonly used types
pub use crate::clustering::{ClusteringParams, DensityClusterer, RECOMMENDED_MAX_ITEMS};
pub use crate::config::DensegroupConfig;
pub use crate::core::{ClusterRecord, Item, Member, NamedCluster, RawCluster};
pub use crate::errors::{ClusterError, EmbedError, ErrorCode, IngestError, StoreError};
pub use crate::io::VectorStore;
pub use crate::merge::merge_clusters;
pub use crate::naming::{CategoryTable, ClusterNamer};
pub use crate::pipeline::{ClusterReport, ClusterStats, GroupingPipeline};
