//! Validation with error accumulation for configuration.
//!
//! Every check runs, and all failures are reported together as
//! [`ConfigError::Invalid`], so a user can fix a config file in one pass.
//! Each message is prefixed with the field path, e.g. `ingest.batch_size`.

use super::core::DensegroupConfig;
use super::retry::RetryConfig;
use crate::errors::ConfigError;
use crate::naming::CategoryTable;

/// Validate the whole config, accumulating every error.
///
/// ```rust
/// use densegroup::config::{validate_config, DensegroupConfig};
///
/// assert!(validate_config(&DensegroupConfig::default()).is_ok());
/// ```
pub fn validate_config(config: &DensegroupConfig) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if let Err(err) = config.clustering.validate() {
        errors.push(format!("clustering.min_cluster_size: {err}"));
    }
    errors.extend(validate_positive("ingest.batch_size", config.ingest.batch_size));
    errors.extend(validate_positive("ingest.concurrency", config.ingest.concurrency));
    errors.extend(validate_positive(
        "ingest.checkpoint_every",
        config.ingest.checkpoint_every,
    ));
    errors.extend(validate_positive("ingest.dimensions", config.ingest.dimensions));
    errors.extend(validate_retry(&config.retry));
    if let Some(table) = &config.naming.categories {
        errors.extend(validate_categories(table));
    }
    if config.store.collection.trim().is_empty() {
        errors.push("store.collection: must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Invalid(errors))
    }
}

fn validate_positive(field: &str, value: usize) -> Option<String> {
    (value == 0).then(|| format!("{field}: must be at least 1"))
}

fn validate_retry(retry: &RetryConfig) -> Vec<String> {
    let mut errors = Vec::new();
    if !(0.0..=1.0).contains(&retry.jitter_factor) {
        errors.push(format!(
            "retry.jitter_factor: must be between 0.0 and 1.0 (got {})",
            retry.jitter_factor
        ));
    }
    if retry.enabled && retry.base_delay_ms == 0 {
        errors.push("retry.base_delay_ms: must be positive when retries are enabled".to_string());
    }
    errors
}

fn validate_categories(table: &CategoryTable) -> Vec<String> {
    let mut errors = Vec::new();
    for (index, category) in table.categories().iter().enumerate() {
        if category.key.trim().is_empty() {
            errors.push(format!("naming.categories[{index}].key: must not be empty"));
        }
        if category.keywords.iter().any(|k| k.trim().is_empty()) {
            errors.push(format!(
                "naming.categories[{index}].keywords: empty keyword would match every token"
            ));
        }
    }
    errors
}
