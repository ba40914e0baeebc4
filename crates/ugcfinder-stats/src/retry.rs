//! Retry with exponential back-off and jitter for stats API lookups.
//!
//! [`retry_with_backoff`] keeps calling an operation until it succeeds, fails
//! with a non-transient error, runs out of its optional time budget, or the
//! shared [`CancellationToken`] fires. Cancellation is observed before every
//! attempt and during the back-off sleep, never inside an attempt that is
//! already in flight.

use std::future::Future;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::error::StatsError;

/// Exponential back-off schedule.
///
/// The n-th retry waits `initial_interval × multiplier^(n-1)`, capped at
/// `max_interval`, then spread by ± `randomization_factor`.
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffPolicy {
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub multiplier: f64,
    pub randomization_factor: f64,
    /// Total time budget across all attempts; `None` never gives up.
    pub max_elapsed: Option<Duration>,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_millis(500),
            max_interval: Duration::from_secs(60),
            multiplier: 1.5,
            randomization_factor: 0.5,
            max_elapsed: None,
        }
    }
}

impl BackoffPolicy {
    /// A policy that retries without sleeping. Used by tests.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            initial_interval: Duration::ZERO,
            max_interval: Duration::ZERO,
            multiplier: 1.0,
            randomization_factor: 0.0,
            max_elapsed: None,
        }
    }

    /// Un-jittered delay before retry number `retry` (1-based).
    #[must_use]
    pub fn base_delay(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry.saturating_sub(1)).unwrap_or(i32::MAX);
        let grown = self.initial_interval.as_secs_f64() * self.multiplier.powi(exponent);
        let capped = grown.min(self.max_interval.as_secs_f64());
        if capped.is_finite() && capped > 0.0 {
            Duration::from_secs_f64(capped)
        } else if capped > 0.0 {
            self.max_interval
        } else {
            Duration::ZERO
        }
    }

    fn jittered_delay(&self, retry: u32) -> Duration {
        let base = self.base_delay(retry);
        if self.randomization_factor <= 0.0 || base.is_zero() {
            return base;
        }
        let spread = (rand::random::<f64>() * 2.0 - 1.0) * self.randomization_factor;
        base.mul_f64((1.0 + spread).max(0.0))
    }
}

/// Runs `operation` until it succeeds, retrying transient errors with
/// exponential back-off.
///
/// # Errors
///
/// - [`StatsError::Cancelled`] if `cancel` fires before an attempt or during
///   a back-off sleep. This is terminal, not retryable.
/// - [`StatsError::RetryBudgetExhausted`] if `policy.max_elapsed` would be
///   exceeded by the next sleep.
/// - Any non-transient error from `operation`, returned as-is.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &BackoffPolicy,
    cancel: &CancellationToken,
    url: &str,
    mut operation: F,
) -> Result<T, StatsError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StatsError>>,
{
    let started = Instant::now();
    let mut attempt = 0u32;
    loop {
        if cancel.is_cancelled() {
            return Err(StatsError::Cancelled {
                url: url.to_owned(),
            });
        }
        attempt += 1;

        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if !err.is_transient() => return Err(err),
            Err(err) => err,
        };

        let delay = policy.jittered_delay(attempt);
        if let Some(budget) = policy.max_elapsed {
            if started.elapsed() + delay > budget {
                return Err(StatsError::RetryBudgetExhausted {
                    url: url.to_owned(),
                    attempts: attempt,
                    last: Box::new(err),
                });
            }
        }

        #[allow(clippy::cast_possible_truncation)]
        let delay_ms = delay.as_millis() as u64;
        if matches!(err, StatsError::Busy { .. }) {
            tracing::debug!(attempt, delay_ms, url, "stats API busy, retrying after back-off");
        } else {
            tracing::warn!(
                attempt,
                delay_ms,
                url,
                error = %err,
                "stats API error, retrying after back-off"
            );
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                return Err(StatsError::Cancelled { url: url.to_owned() });
            }
            () = tokio::time::sleep(delay) => {}
        }
    }
}
