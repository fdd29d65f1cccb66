//! Batched, bounded-concurrency embedding with retry and checkpoints.

use super::checkpoint::Checkpoint;
use super::provider::EmbeddingProvider;
use crate::config::{IngestConfig, RetryConfig};
use crate::errors::{EmbedError, IngestError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};
use xxhash_rust::xxh64::xxh64;

/// What happened to one input text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EmbeddingOutcome {
    Embedded { embedding: Vec<f64>, attempts: u32 },
    Failed { reason: String, attempts: u32 },
}

impl EmbeddingOutcome {
    pub fn embedding(&self) -> Option<&[f64]> {
        match self {
            Self::Embedded { embedding, .. } => Some(embedding),
            Self::Failed { .. } => None,
        }
    }

    pub fn attempts(&self) -> u32 {
        match self {
            Self::Embedded { attempts, .. } | Self::Failed { attempts, .. } => *attempts,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Snapshot passed to the progress callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestProgress {
    pub completed: usize,
    pub total: usize,
    pub failed: usize,
}

/// Per-input outcomes of a run, ordered by input index.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestReport {
    pub outcomes: Vec<EmbeddingOutcome>,
    /// Inputs restored from a checkpoint instead of embedded in this run.
    pub resumed: usize,
}

impl IngestReport {
    pub fn embedded_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_failed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }
}

/// Embeds an ordered list of texts through an [`EmbeddingProvider`].
///
/// Texts are processed in batches of `batch_size`. At most `concurrency`
/// provider calls are in flight. Rate-limited calls are retried on the
/// [`RetryConfig`] schedule; any other error is recorded as
/// [`EmbeddingOutcome::Failed`] without stopping the run.
pub struct EmbeddingPipeline<P: EmbeddingProvider> {
    provider: Arc<P>,
    config: IngestConfig,
    retry: Arc<RetryConfig>,
}

impl<P: EmbeddingProvider> EmbeddingPipeline<P> {
    pub fn new(provider: P, config: IngestConfig, retry: RetryConfig) -> Self {
        Self {
            provider: Arc::new(provider),
            config,
            retry: Arc::new(retry),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Embed `texts`, resuming from and saving to `checkpoint` when given.
    ///
    /// A checkpoint written for a different model or different inputs is
    /// ignored with a warning.
    ///
    /// # Errors
    ///
    /// [`IngestError`] if the checkpoint cannot be written or a worker task
    /// panics. Provider errors never abort the run.
    pub async fn run<F>(
        &self,
        texts: &[String],
        checkpoint: Option<&Path>,
        mut progress: F,
    ) -> Result<IngestReport, IngestError>
    where
        F: FnMut(IngestProgress),
    {
        let model_id = self.provider.model_id();
        let mut state = match checkpoint {
            Some(path) => self.resume(path, model_id, texts),
            None => Checkpoint::new(model_id, texts),
        };
        let resumed = state.completed;
        let total = texts.len();
        let batch_size = self.config.batch_size.max(1);
        let checkpoint_every = self.config.checkpoint_every.max(1);
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency.max(1)));

        let mut failed = state.outcomes.iter().filter(|o| o.is_failed()).count();
        progress(IngestProgress {
            completed: resumed,
            total,
            failed,
        });

        let mut batches = 0usize;
        let mut start = resumed;
        while start < total {
            let end = (start + batch_size).min(total);
            let span = info_span!("embed_batch", start, end);
            let outcomes = self
                .run_batch(&texts[start..end], start, &semaphore, |done, newly_failed| {
                    failed += newly_failed;
                    progress(IngestProgress {
                        completed: start + done,
                        total,
                        failed,
                    });
                })
                .instrument(span)
                .await?;
            state.extend(outcomes);
            batches += 1;

            if let Some(path) = checkpoint {
                if batches % checkpoint_every == 0 {
                    state.save(path)?;
                    debug!(completed = state.completed, "Checkpoint saved");
                }
            }

            start = end;
            if start < total && self.config.batch_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.batch_delay_ms)).await;
            }
        }

        if let Some(path) = checkpoint {
            state.save(path)?;
        }

        let report = IngestReport {
            outcomes: state.outcomes,
            resumed,
        };
        info!(
            embedded = report.embedded_count(),
            failed = report.failed_count(),
            resumed,
            "Embedding run complete"
        );
        Ok(report)
    }

    fn resume(&self, path: &Path, model_id: &str, texts: &[String]) -> Checkpoint {
        match Checkpoint::load(path) {
            Ok(Some(saved)) if saved.matches(model_id, texts) => {
                info!(completed = saved.completed, total = saved.total, "Resuming from checkpoint");
                saved
            }
            Ok(Some(_)) => {
                warn!(path = %path.display(), "Checkpoint is for other inputs or model; starting over");
                Checkpoint::new(model_id, texts)
            }
            Ok(None) => Checkpoint::new(model_id, texts),
            Err(err) => {
                warn!(error = %err, "Unreadable checkpoint; starting over");
                Checkpoint::new(model_id, texts)
            }
        }
    }

    /// Embed one batch; `on_done(done_in_batch, newly_failed)` fires per
    /// finished input.
    async fn run_batch(
        &self,
        batch: &[String],
        offset: usize,
        semaphore: &Arc<Semaphore>,
        mut on_done: impl FnMut(usize, usize),
    ) -> Result<Vec<EmbeddingOutcome>, IngestError> {
        let mut tasks = JoinSet::new();
        for (position, text) in batch.iter().enumerate() {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| IngestError::Task(e.to_string()))?;
            let provider = Arc::clone(&self.provider);
            let retry = Arc::clone(&self.retry);
            let text = text.clone();
            tasks.spawn(async move {
                let outcome = embed_with_retry(provider.as_ref(), text, &retry).await;
                drop(permit);
                (position, outcome)
            });
        }

        let mut slots: Vec<Option<EmbeddingOutcome>> = vec![None; batch.len()];
        let mut done = 0;
        while let Some(joined) = tasks.join_next().await {
            let (position, outcome) = joined.map_err(|e| IngestError::Task(e.to_string()))?;
            if let EmbeddingOutcome::Failed { reason, attempts } = &outcome {
                warn!(index = offset + position, attempts, reason = %reason, "Embedding failed");
            }
            let newly_failed = usize::from(outcome.is_failed());
            slots[position] = Some(outcome);
            done += 1;
            on_done(done, newly_failed);
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(position, slot)| {
                slot.ok_or_else(|| {
                    IngestError::Task(format!("no result for input {}", offset + position))
                })
            })
            .collect()
    }
}

/// Call the provider, retrying rate-limited attempts while `retry` allows.
///
/// Backoff jitter is keyed on the text, so calls throttled together do not
/// retry in lockstep.
pub async fn embed_with_retry<P: EmbeddingProvider>(
    provider: &P,
    text: String,
    retry: &RetryConfig,
) -> EmbeddingOutcome {
    let started = Instant::now();
    let jitter_key = xxh64(text.as_bytes(), 0);
    let mut retries = 0u32;
    loop {
        let result = provider
            .embed(text.clone())
            .await
            .and_then(|embedding| check_embedding(embedding, provider.dimensions()));
        match result {
            Ok(embedding) => {
                return EmbeddingOutcome::Embedded {
                    embedding,
                    attempts: retries + 1,
                }
            }
            Err(err) if err.is_retryable() && retry.should_retry(retries, started.elapsed()) => {
                retries += 1;
                let delay = retry.delay_for_key(retries, jitter_key);
                debug!(retries, delay_ms = delay.as_millis() as u64, "Rate limited, backing off");
                tokio::time::sleep(delay).await;
            }
            Err(err) => {
                return EmbeddingOutcome::Failed {
                    reason: err.to_string(),
                    attempts: retries + 1,
                }
            }
        }
    }
}

fn check_embedding(embedding: Vec<f64>, dimensions: usize) -> Result<Vec<f64>, EmbedError> {
    if embedding.len() != dimensions {
        return Err(EmbedError::InvalidResponse(format!(
            "expected {dimensions} values, got {}",
            embedding.len()
        )));
    }
    if embedding.iter().any(|v| !v.is_finite()) {
        return Err(EmbedError::InvalidResponse("non-finite value".to_string()));
    }
    Ok(embedding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::HashingEmbedder;

    fn fast_config() -> IngestConfig {
        IngestConfig {
            batch_size: 3,
            concurrency: 2,
            batch_delay_ms: 0,
            ..Default::default()
        }
    }

    #[test]
    fn test_check_embedding() {
        assert!(check_embedding(vec![1.0, 2.0], 2).is_ok());
        assert!(check_embedding(vec![1.0], 2).is_err());
        assert!(check_embedding(vec![f64::INFINITY, 0.0], 2).is_err());
    }

    #[test]
    fn test_outcome_serde_is_tagged() {
        let json = serde_json::to_value(EmbeddingOutcome::Failed {
            reason: "x".into(),
            attempts: 2,
        })
        .unwrap();
        assert_eq!(json["status"], "failed");
    }

    #[tokio::test]
    async fn test_outcomes_follow_input_order() {
        let embedder = HashingEmbedder::new(16);
        let expected: Vec<Vec<f64>> = ["a", "bb", "ccc", "dddd", "eeeee"]
            .iter()
            .map(|t| embedder.embed_text(t))
            .collect();
        let texts: Vec<String> = ["a", "bb", "ccc", "dddd", "eeeee"]
            .iter()
            .map(|t| t.to_string())
            .collect();

        let pipeline = EmbeddingPipeline::new(embedder, fast_config(), RetryConfig::default());
        let mut seen = Vec::new();
        let report = pipeline
            .run(&texts, None, |p| seen.push(p.completed))
            .await
            .unwrap();

        let got: Vec<Vec<f64>> = report
            .outcomes
            .iter()
            .map(|o| o.embedding().unwrap().to_vec())
            .collect();
        assert_eq!(got, expected);
        assert_eq!(seen.first(), Some(&0));
        assert_eq!(seen.last(), Some(&5));
        assert_eq!(report.resumed, 0);
    }
}
