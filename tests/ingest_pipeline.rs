//! Embedding pipeline behavior against scripted providers.

use densegroup::config::{IngestConfig, RetryConfig, RetryStrategy};
use densegroup::ingest::{
    embed_with_retry, Checkpoint, EmbeddingOutcome, EmbeddingPipeline, EmbeddingProvider,
    HashingEmbedder,
};
use densegroup::EmbedError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tempfile::TempDir;

/// Rate-limits the first `throttled` calls, then answers with `[len, 1.0]`.
struct Throttled {
    throttled: usize,
    calls: AtomicUsize,
}

impl Throttled {
    fn new(throttled: usize) -> Self {
        Self {
            throttled,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EmbeddingProvider for Throttled {
    fn model_id(&self) -> &str {
        "throttled"
    }

    fn dimensions(&self) -> usize {
        2
    }

    async fn embed(&self, text: String) -> Result<Vec<f64>, EmbedError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.throttled {
            return Err(EmbedError::RateLimited("slow down".into()));
        }
        Ok(vec![text.len() as f64, 1.0])
    }
}

/// Fails every text containing "bad" and records what it was asked.
#[derive(Default)]
struct Picky {
    seen: Mutex<Vec<String>>,
}

impl EmbeddingProvider for Picky {
    fn model_id(&self) -> &str {
        "picky"
    }

    fn dimensions(&self) -> usize {
        2
    }

    async fn embed(&self, text: String) -> Result<Vec<f64>, EmbedError> {
        self.seen.lock().unwrap().push(text.clone());
        if text.contains("bad") {
            return Err(EmbedError::Request(format!("cannot embed {text}")));
        }
        Ok(vec![text.len() as f64, 0.0])
    }
}

/// Tracks how many calls run at the same time.
#[derive(Default)]
struct Slow {
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl EmbeddingProvider for Slow {
    fn model_id(&self) -> &str {
        "slow"
    }

    fn dimensions(&self) -> usize {
        1
    }

    async fn embed(&self, _text: String) -> Result<Vec<f64>, EmbedError> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        self.active.fetch_sub(1, Ordering::SeqCst);
        Ok(vec![1.0])
    }
}

fn quick_retry() -> RetryConfig {
    RetryConfig {
        max_retries: 3,
        base_delay_ms: 1,
        strategy: RetryStrategy::Constant,
        jitter_factor: 0.0,
        ..Default::default()
    }
}

fn ingest(batch_size: usize, concurrency: usize) -> IngestConfig {
    IngestConfig {
        batch_size,
        concurrency,
        batch_delay_ms: 0,
        ..Default::default()
    }
}

fn texts(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[tokio::test]
async fn rate_limited_calls_are_retried() {
    let provider = Throttled::new(2);
    let outcome = embed_with_retry(&provider, "abc".into(), &quick_retry()).await;

    assert_eq!(
        outcome,
        EmbeddingOutcome::Embedded {
            embedding: vec![3.0, 1.0],
            attempts: 3
        }
    );
    assert_eq!(provider.calls(), 3);
}

#[tokio::test]
async fn retries_stop_at_the_limit() {
    let provider = Throttled::new(10);
    let outcome = embed_with_retry(&provider, "abc".into(), &quick_retry()).await;

    assert!(outcome.is_failed());
    assert_eq!(outcome.attempts(), 4);
    assert_eq!(provider.calls(), 4);
}

#[tokio::test]
async fn disabled_retry_fails_on_first_rate_limit() {
    let provider = Throttled::new(1);
    let outcome = embed_with_retry(&provider, "abc".into(), &RetryConfig::disabled()).await;

    assert!(outcome.is_failed());
    assert_eq!(outcome.attempts(), 1);
}

#[tokio::test]
async fn request_errors_are_not_retried() {
    let provider = Picky::default();
    let outcome = embed_with_retry(&provider, "bad row".into(), &quick_retry()).await;

    match outcome {
        EmbeddingOutcome::Failed { reason, attempts } => {
            assert_eq!(attempts, 1);
            assert!(reason.contains("cannot embed bad row"));
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn failures_do_not_stop_the_run() {
    let pipeline = EmbeddingPipeline::new(Picky::default(), ingest(2, 2), quick_retry());
    let inputs = texts(&["one", "bad two", "three", "bad four", "five"]);

    let mut updates = Vec::new();
    let report = pipeline
        .run(&inputs, None, |p| updates.push(p))
        .await
        .unwrap();

    assert_eq!(report.outcomes.len(), 5);
    assert_eq!(report.embedded_count(), 3);
    assert_eq!(report.failed_count(), 2);
    assert_eq!(report.outcomes[2].embedding(), Some(&[5.0, 0.0][..]));
    assert!(report.outcomes[3].is_failed());

    let last = updates.last().unwrap();
    assert_eq!((last.completed, last.total, last.failed), (5, 5, 2));
}

#[tokio::test]
async fn concurrency_is_bounded() {
    let pipeline = EmbeddingPipeline::new(Slow::default(), ingest(20, 3), quick_retry());
    let inputs: Vec<String> = (0..20).map(|i| format!("text {i}")).collect();

    let report = pipeline.run(&inputs, None, |_| {}).await.unwrap();

    assert_eq!(report.embedded_count(), 20);
    let peak = pipeline.provider().peak.load(Ordering::SeqCst);
    assert!(peak <= 3, "peak concurrency {peak}");
    assert!(peak >= 1);
}

#[tokio::test]
async fn run_resumes_from_checkpoint() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("run.checkpoint.json");
    let inputs = texts(&["alpha", "beta", "gamma", "delta"]);

    let mut saved = Checkpoint::new("picky", &inputs);
    saved.extend([
        EmbeddingOutcome::Embedded {
            embedding: vec![9.0, 9.0],
            attempts: 1,
        },
        EmbeddingOutcome::Embedded {
            embedding: vec![8.0, 8.0],
            attempts: 1,
        },
    ]);
    saved.save(&path).unwrap();

    let pipeline = EmbeddingPipeline::new(Picky::default(), ingest(1, 1), quick_retry());
    let report = pipeline.run(&inputs, Some(&path), |_| {}).await.unwrap();

    assert_eq!(report.resumed, 2);
    assert_eq!(report.outcomes[0].embedding(), Some(&[9.0, 9.0][..]));
    assert_eq!(report.outcomes[3].embedding(), Some(&[5.0, 0.0][..]));
    assert_eq!(
        *pipeline.provider().seen.lock().unwrap(),
        texts(&["gamma", "delta"])
    );

    let stored = Checkpoint::load(&path).unwrap().unwrap();
    assert!(stored.is_complete());
}

#[tokio::test]
async fn checkpoint_for_other_inputs_is_ignored() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("run.checkpoint.json");

    let mut stale = Checkpoint::new("picky", &texts(&["old", "rows"]));
    stale.extend([EmbeddingOutcome::Embedded {
        embedding: vec![1.0, 1.0],
        attempts: 1,
    }]);
    stale.save(&path).unwrap();

    let inputs = texts(&["new", "rows"]);
    let pipeline = EmbeddingPipeline::new(Picky::default(), ingest(10, 2), quick_retry());
    let report = pipeline.run(&inputs, Some(&path), |_| {}).await.unwrap();

    assert_eq!(report.resumed, 0);
    assert_eq!(pipeline.provider().seen.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn hashing_embedder_runs_through_the_pipeline() {
    let embedder = HashingEmbedder::new(32);
    let expected = embedder.embed_text("Pipe Welder");
    let pipeline = EmbeddingPipeline::new(embedder, ingest(4, 4), RetryConfig::default());

    let report = pipeline
        .run(&texts(&["Pipe Welder", "Clinic Nurse"]), None, |_| {})
        .await
        .unwrap();

    assert_eq!(report.outcomes[0].embedding(), Some(expected.as_slice()));
    assert_eq!(report.outcomes[1].embedding().map(<[f64]>::len), Some(32));
}
