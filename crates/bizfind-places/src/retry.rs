//! Bounded retry with deterministic exponential back-off.
//!
//! [`retry_with_backoff`] runs a remote call up to `max_attempts` times.
//! Transient failures (rate limiting, timeouts, network faults) sleep
//! `backoff_unit * backoff_factor^attempt` before the next attempt; terminal
//! failures (denied, invalid request, unknown status) return immediately.

use std::future::Future;
use std::time::Duration;

use bizfind_core::FailureKind;

use crate::error::{RemoteFailure, RemoteOutcome};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BACKOFF_FACTOR: u64 = 2;

/// Attempt ceiling and back-off schedule for one remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first. Zero makes no call at all.
    pub max_attempts: u32,
    pub backoff_factor: u64,
    /// Multiplied by `backoff_factor^attempt`; one second in production.
    pub backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            backoff_unit: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_attempts: u32, backoff_factor: u64, backoff_unit: Duration) -> Self {
        Self {
            max_attempts,
            backoff_factor,
            backoff_unit,
        }
    }

    /// Delay after the zero-based `attempt` fails with a retryable outcome.
    ///
    /// | attempt | delay (factor 2, unit 1 s) |
    /// |---------|----------------------------|
    /// | 0       | 1 s                        |
    /// | 1       | 2 s                        |
    /// | 2       | 4 s                        |
    #[must_use]
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let multiplier = self.backoff_factor.saturating_pow(attempt);
        self.backoff_unit
            .saturating_mul(u32::try_from(multiplier).unwrap_or(u32::MAX))
    }
}

/// Runs `operation` under `policy`.
///
/// Exhausting the attempts on a timeout or network fault returns that last
/// failure; exhausting them on rate limiting returns "Max retries exceeded".
/// No sleep follows the final attempt.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    mut operation: F,
) -> RemoteOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = RemoteOutcome<T>>,
{
    for attempt in 0..policy.max_attempts {
        let failure = match operation().await {
            Ok(value) => return Ok(value),
            Err(failure) => failure,
        };

        if !failure.kind.is_retryable() {
            return Err(failure);
        }
        if attempt + 1 >= policy.max_attempts {
            return Err(exhausted(failure));
        }

        let delay = policy.backoff_delay(attempt);
        tracing::warn!(
            attempt,
            max_attempts = policy.max_attempts,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            kind = %failure.kind,
            error = %failure,
            "transient Places API failure, retrying after back-off"
        );
        tokio::time::sleep(delay).await;
    }

    Err(RemoteFailure::max_retries_exceeded())
}

fn exhausted(last: RemoteFailure) -> RemoteFailure {
    match last.kind {
        FailureKind::Timeout | FailureKind::NetworkError => last,
        _ => RemoteFailure::max_retries_exceeded(),
    }
}
