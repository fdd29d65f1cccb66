//! Retry configuration for rate-limited embedding calls.
//!
//! Embedding providers signal overload with rate-limit errors. Those calls
//! are retried with a growing delay; any other failure is recorded at once.
//!
//! # Configuration Example
//!
//! ```toml
//! [retry]
//! enabled = true
//! max_retries = 5
//! base_delay_ms = 500
//! strategy = "exponential"
//! timeout_seconds = 120
//! jitter_factor = 0.1
//! ```
//!
//! # Retry Strategies
//!
//! - **Constant**: Same delay between each retry
//! - **Linear**: Delay increases linearly (base * attempt)
//! - **Exponential**: Delay doubles each attempt (base * 2^(attempt-1))
//! - **Fibonacci**: Delay follows fibonacci sequence

use serde::{Deserialize, Serialize};
use std::time::Duration;
use xxhash_rust::xxh64::xxh64;

/// Backoff schedule for rate-limited calls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetryConfig {
    /// Enable retries on rate limiting (default: true)
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Maximum number of retries per call (default: 5)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay between retries in milliseconds (default: 500)
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Retry strategy (default: exponential)
    #[serde(default)]
    pub strategy: RetryStrategy,

    /// Maximum total time to spend retrying one call in seconds (default: 120)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Jitter factor added to delays (default: 0.1 = 10%)
    ///
    /// A delay grows by up to `factor` of itself. With
    /// [`delay_for_key`](RetryConfig::delay_for_key) the share depends on the
    /// key, so calls throttled together wake at different times.
    #[serde(default = "default_jitter_factor")]
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            strategy: RetryStrategy::default(),
            timeout_seconds: default_timeout_seconds(),
            jitter_factor: default_jitter_factor(),
        }
    }
}

impl RetryConfig {
    /// Create a retry config with retries disabled.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Get the base delay as a Duration.
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    /// Get the timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Delay before retry number `attempt` (1-indexed), padded by half the
    /// jitter range.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.jittered_delay(attempt, 0.5)
    }

    /// Delay before retry number `attempt` for the call identified by `key`.
    ///
    /// The jitter share is drawn from an xxh64 of `key` and `attempt`: the
    /// same call retries on the same schedule, different calls spread out.
    pub fn delay_for_key(&self, attempt: u32, key: u64) -> Duration {
        let hash = xxh64(&attempt.to_le_bytes(), key);
        let share = (hash >> 11) as f64 / (1u64 << 53) as f64;
        self.jittered_delay(attempt, share)
    }

    fn jittered_delay(&self, attempt: u32, share: f64) -> Duration {
        let base_ms = self.base_delay_ms as f64;

        let delay_ms = match self.strategy {
            RetryStrategy::Constant => base_ms,
            RetryStrategy::Linear => base_ms * (attempt as f64),
            RetryStrategy::Exponential => base_ms * 2.0_f64.powi(attempt as i32 - 1),
            RetryStrategy::Fibonacci => base_ms * (fibonacci(attempt) as f64),
        };

        let jittered_ms = if self.jitter_factor > 0.0 {
            apply_jitter(delay_ms, self.jitter_factor, share)
        } else {
            delay_ms
        };

        // Never wait longer than the whole retry budget, nor 100x the base
        let max_delay_ms = (self.timeout_seconds * 1000) as f64;
        let final_ms = jittered_ms.min(max_delay_ms);

        Duration::from_millis(final_ms as u64).min(self.base_delay() * 100)
    }

    /// Whether another retry is allowed after `attempt` retries and
    /// `elapsed` time spent on the call.
    pub fn should_retry(&self, attempt: u32, elapsed: Duration) -> bool {
        if !self.enabled {
            return false;
        }
        attempt < self.max_retries && elapsed < self.timeout()
    }
}

/// Retry delay strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RetryStrategy {
    /// Same delay between each retry.
    Constant,
    /// Delay increases linearly: base * attempt.
    Linear,
    /// Delay doubles each attempt: base * 2^(attempt-1).
    #[default]
    Exponential,
    /// Delay follows fibonacci sequence: base * fib(attempt).
    Fibonacci,
}

fn default_enabled() -> bool {
    true
}

fn default_max_retries() -> u32 {
    5
}

fn default_base_delay_ms() -> u64 {
    500
}

fn default_timeout_seconds() -> u64 {
    120
}

fn default_jitter_factor() -> f64 {
    0.1
}

/// Compute the nth fibonacci number (1-indexed).
fn fibonacci(n: u32) -> u64 {
    match n {
        0 => 0,
        1 | 2 => 1,
        _ => {
            let mut a = 1u64;
            let mut b = 1u64;
            for _ in 2..n {
                let c = a.saturating_add(b);
                a = b;
                b = c;
            }
            b
        }
    }
}

/// Add `share` (in `[0, 1)`) of the jitter range to `delay_ms`.
fn apply_jitter(delay_ms: f64, factor: f64, share: f64) -> f64 {
    delay_ms + delay_ms * factor * share
}
