//! Error types for densegroup operations.
//!
//! Each concern gets its own `thiserror` enum so callers can match on the
//! failures they can act on:
//!
//! - [`ClusterError`]: input validation for the clustering core
//! - [`InputError`]: reading item lists from CSV
//! - [`ConfigError`]: loading and validating `.densegroup.toml`
//! - [`StoreError`]: the file-backed vector store
//! - [`EmbedError`]: a single call to an embedding provider
//! - [`IngestError`]: the batched embedding pipeline and its checkpoint
//!
//! Every error exposes a stable [`ErrorCode`] for programmatic handling.
//!
//! # Error Codes
//!
//! - E001-E009: I/O and filesystem errors
//! - E010-E019: Input parsing errors
//! - E020-E029: Configuration errors
//! - E030-E039: Clustering errors
//! - E040-E049: Embedding and ingestion errors
//! - E050-E059: Store errors

use std::path::PathBuf;
use thiserror::Error;

/// Structured error code for documentation and programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode(&'static str);

impl ErrorCode {
    /// I/O error - generic
    pub const IO_GENERIC: ErrorCode = ErrorCode("E009");

    /// Input error - missing column
    pub const INPUT_MISSING_COLUMN: ErrorCode = ErrorCode("E010");
    /// Input error - malformed record
    pub const INPUT_MALFORMED: ErrorCode = ErrorCode("E011");

    /// Config error - invalid value
    pub const CONFIG_INVALID: ErrorCode = ErrorCode("E020");
    /// Config error - unreadable or unparsable file
    pub const CONFIG_PARSE: ErrorCode = ErrorCode("E021");

    /// Clustering error - embedding dimensions differ
    pub const CLUSTER_DIMENSION_MISMATCH: ErrorCode = ErrorCode("E030");
    /// Clustering error - parameter out of range
    pub const CLUSTER_INVALID_PARAMETER: ErrorCode = ErrorCode("E031");
    /// Clustering error - NaN or infinite component
    pub const CLUSTER_NON_FINITE: ErrorCode = ErrorCode("E032");

    /// Embedding error - provider rate limited the request
    pub const EMBED_RATE_LIMITED: ErrorCode = ErrorCode("E040");
    /// Embedding error - request failed
    pub const EMBED_REQUEST: ErrorCode = ErrorCode("E041");
    /// Embedding error - provider returned an unusable vector
    pub const EMBED_INVALID_RESPONSE: ErrorCode = ErrorCode("E042");
    /// Ingestion error - checkpoint unreadable or unwritable
    pub const INGEST_CHECKPOINT: ErrorCode = ErrorCode("E045");
    /// Ingestion error - worker task aborted
    pub const INGEST_TASK: ErrorCode = ErrorCode("E046");

    /// Store error - corrupt record
    pub const STORE_CORRUPT: ErrorCode = ErrorCode("E050");
    /// Store error - duplicate id
    pub const STORE_DUPLICATE_ID: ErrorCode = ErrorCode("E051");

    /// Get the error code string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation failures raised by the clustering core before any computation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClusterError {
    /// An embedding's length differs from the first item's.
    #[error("embedding dimension mismatch: item {index} has {found} values, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    /// A clustering parameter is outside its valid range.
    #[error("invalid parameter `{name}`: {message}")]
    InvalidParameter { name: &'static str, message: String },

    /// An embedding contains NaN or an infinity.
    #[error("embedding for item {index} has a non-finite value at position {position}")]
    NonFiniteEmbedding { index: usize, position: usize },
}

impl ClusterError {
    /// Create an invalid parameter error.
    pub fn invalid_parameter(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::DimensionMismatch { .. } => ErrorCode::CLUSTER_DIMENSION_MISMATCH,
            Self::InvalidParameter { .. } => ErrorCode::CLUSTER_INVALID_PARAMETER,
            Self::NonFiniteEmbedding { .. } => ErrorCode::CLUSTER_NON_FINITE,
        }
    }
}

/// Errors reading item lists from CSV.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: no `{column}` column in header")]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("{path}:{line}: {message}")]
    Malformed {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

impl InputError {
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Io { .. } => ErrorCode::IO_GENERIC,
            Self::MissingColumn { .. } => ErrorCode::INPUT_MISSING_COLUMN,
            Self::Malformed { .. } => ErrorCode::INPUT_MALFORMED,
        }
    }
}

/// Errors loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<toml::de::Error>,
    },

    /// All failed checks, reported together.
    #[error("invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

impl ConfigError {
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Io { .. } | Self::Parse { .. } => ErrorCode::CONFIG_PARSE,
            Self::Invalid(_) => ErrorCode::CONFIG_INVALID,
        }
    }
}

/// Errors raised by the vector store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt record in {path} at line {line}: {source}")]
    Corrupt {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("item id `{0}` already exists in the collection")]
    DuplicateId(String),

    #[error(transparent)]
    Cluster(#[from] ClusterError),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Io { .. } => ErrorCode::IO_GENERIC,
            Self::Corrupt { .. } => ErrorCode::STORE_CORRUPT,
            Self::DuplicateId(_) => ErrorCode::STORE_DUPLICATE_ID,
            Self::Cluster(err) => err.code(),
        }
    }
}

/// Failure of a single embedding request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmbedError {
    /// The provider asked us to slow down.
    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl EmbedError {
    /// Only rate-limit signals are retried with backoff.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }

    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::RateLimited(_) => ErrorCode::EMBED_RATE_LIMITED,
            Self::Request(_) => ErrorCode::EMBED_REQUEST,
            Self::InvalidResponse(_) => ErrorCode::EMBED_INVALID_RESPONSE,
        }
    }
}

/// Errors that abort the embedding pipeline as a whole.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("checkpoint I/O failed for {path}: {source}")]
    CheckpointIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("checkpoint {path} could not be encoded or decoded: {source}")]
    CheckpointFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("embedding task aborted: {0}")]
    Task(String),
}

impl IngestError {
    /// Checkpoint I/O may succeed on a later run; aborted tasks will not.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::CheckpointIo { .. })
    }

    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::CheckpointIo { .. } | Self::CheckpointFormat { .. } => {
                ErrorCode::INGEST_CHECKPOINT
            }
            Self::Task(_) => ErrorCode::INGEST_TASK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_error_codes() {
        let err = ClusterError::DimensionMismatch {
            index: 3,
            expected: 2,
            found: 4,
        };
        assert_eq!(err.code(), ErrorCode::CLUSTER_DIMENSION_MISMATCH);
        assert_eq!(
            err.to_string(),
            "embedding dimension mismatch: item 3 has 4 values, expected 2"
        );

        let err = ClusterError::invalid_parameter("min_cluster_size", "must be at least 1");
        assert_eq!(err.code().as_str(), "E031");
        assert!(err.to_string().contains("min_cluster_size"));
    }

    #[test]
    fn test_embed_error_retryable() {
        assert!(EmbedError::RateLimited("429".into()).is_retryable());
        assert!(!EmbedError::Request("boom".into()).is_retryable());
        assert!(!EmbedError::InvalidResponse("empty".into()).is_retryable());
    }

    #[test]
    fn test_store_error_wraps_cluster_code() {
        let err: StoreError = ClusterError::NonFiniteEmbedding {
            index: 0,
            position: 1,
        }
        .into();
        assert_eq!(err.code(), ErrorCode::CLUSTER_NON_FINITE);
    }

    #[test]
    fn test_config_errors_are_joined() {
        let err = ConfigError::Invalid(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "invalid configuration: a; b");
        assert_eq!(err.code(), ErrorCode::CONFIG_INVALID);
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::STORE_DUPLICATE_ID.to_string(), "E051");
    }
}
