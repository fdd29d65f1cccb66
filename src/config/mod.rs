//! Configuration for densegroup.
//!
//! Settings live in `.densegroup.toml`, found in the working directory or
//! one of its ancestors. Every field has a default, and command-line flags
//! override file values.
//!
//! ```toml
//! [clustering]
//! min_cluster_size = 5
//!
//! [ingest]
//! batch_size = 100
//! concurrency = 16
//!
//! [store]
//! dir = ".densegroup"
//! collection = "embeddings"
//!
//! [[naming.categories]]
//! key = "logistics"
//! label = "Logistics"
//! keywords = ["freight", "warehouse", "courier"]
//! ```

mod core;
mod loader;
mod retry;
mod validation;

pub use self::core::{DensegroupConfig, IngestConfig, NamingConfig, OutputConfig, StoreConfig};
pub use loader::{
    directory_ancestors, load_config, load_config_from, load_config_near,
    parse_and_validate_config, CONFIG_FILE_NAME,
};
pub use retry::{RetryConfig, RetryStrategy};
pub use validation::validate_config;
