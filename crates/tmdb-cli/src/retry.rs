//! Caller-side retry with exponential backoff and jitter.
//!
//! The library makes exactly one attempt per call; commands that want to
//! ride out a flaky connection wrap their calls in [`retry_async`].

use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// How many times to try and how long to wait in between.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Scale each delay by a random factor in `[0.5, 1.5)`.
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Delay before the retry following failed attempt `attempt` (0-indexed).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let doubled = self
            .base_delay
            .checked_mul(2u32.saturating_pow(attempt))
            .unwrap_or(self.max_delay);
        let capped = doubled.min(self.max_delay);
        if !self.jitter {
            return capped;
        }
        let factor: f64 = rand::rng().random_range(0.5..1.5);
        capped.mul_f64(factor).min(self.max_delay)
    }
}

/// Run `operation` until it succeeds, fails with an error `should_retry`
/// rejects, or the policy runs out of attempts. Returns the last outcome.
pub async fn retry_async<F, Fut, T, E>(
    policy: &RetryPolicy,
    mut operation: F,
    should_retry: impl Fn(&E) -> bool,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0;
    loop {
        let error = match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!("Succeeded after {} attempts", attempt + 1);
                }
                return Ok(value);
            }
            Err(e) => e,
        };

        if !should_retry(&error) {
            return Err(error);
        }
        if attempt + 1 >= policy.max_attempts {
            warn!("Giving up after {} attempts: {}", attempt + 1, error);
            return Err(error);
        }

        let delay = policy.delay_for(attempt);
        warn!(
            "Attempt {}/{} failed: {}. Retrying in {:?}",
            attempt + 1,
            policy.max_attempts,
            error,
            delay
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
