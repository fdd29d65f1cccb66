//! Core data model shared by the clustering engine, the naming stage and
//! the surrounding I/O layers.

pub mod types;

pub use types::{ClusterRecord, Item, Member, NamedCluster, RawCluster};
