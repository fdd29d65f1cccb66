//! Embedding acquisition.
//!
//! Turns an ordered list of texts into per-index embeddings (or recorded
//! failures), with bounded concurrency, backoff on rate limiting and a
//! resumable checkpoint. This is the only asynchronous part of the crate;
//! clustering consumes its fully materialized output.

mod checkpoint;
mod provider;
mod runner;

pub use checkpoint::{input_digest, Checkpoint};
pub use provider::{EmbeddingProvider, HashingEmbedder};
pub use runner::{
    embed_with_retry, EmbeddingOutcome, EmbeddingPipeline, IngestProgress, IngestReport,
};
