// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Fixed-interval, bounded retry of an async probe

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::trace;

/// Outcome of a single successful probe invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe<T> {
    /// Condition met, stop retrying
    Ready(T),
    /// Condition not met yet, try again after the interval
    Pending,
}

#[derive(Error, Debug)]
pub enum RetryError<E> {
    #[error("condition not met after {attempts} attempts")]
    Timeout { attempts: usize },

    #[error("retry needs at least one attempt")]
    NoAttempts,

    #[error("probe failed: {0}")]
    Aborted(E),
}

/// Number of attempts that fit in `timeout`, truncated towards zero.
///
/// Returns 0 for a zero `interval` and saturates at `usize::MAX`.
pub fn attempts_for(timeout: Duration, interval: Duration) -> usize {
    if interval.is_zero() {
        return 0;
    }
    usize::try_from(timeout.as_nanos() / interval.as_nanos()).unwrap_or(usize::MAX)
}

/// Invoke `probe` up to `max_attempts` times, sleeping `interval` between attempts.
///
/// A probe error aborts immediately and is returned unchanged inside
/// [`RetryError::Aborted`]. When every attempt reports [`Probe::Pending`] the call
/// fails with [`RetryError::Timeout`].
pub async fn retry<T, E, F, Fut>(
    interval: Duration,
    max_attempts: usize,
    mut probe: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Probe<T>, E>>,
{
    if max_attempts == 0 {
        return Err(RetryError::NoAttempts);
    }

    for attempt in 1..=max_attempts {
        match probe().await.map_err(RetryError::Aborted)? {
            Probe::Ready(value) => return Ok(value),
            Probe::Pending => trace!(attempt, max_attempts, "condition not met"),
        }

        if attempt < max_attempts {
            sleep(interval).await;
        }
    }

    Err(RetryError::Timeout {
        attempts: max_attempts,
    })
}
