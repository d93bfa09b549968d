// src/utils/retry.rs

//! Fixed-backoff retry policy for transient transport failures.
//!
//! The historical scrape is a long-running job; one flaky request should not
//! fail it. The default policy retries forever with a fixed 30 second
//! backoff, matching the remote service's tolerance for slow clients. Tests
//! drive the backoff with tokio's paused clock instead of real sleeps.

use std::future::Future;
use std::time::Duration;

use log::warn;

use crate::error::Result;

/// Retry policy with a fixed backoff between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay between attempts.
    pub backoff: Duration,
    /// Optional ceiling on attempts. `None` retries forever.
    pub max_attempts: Option<u32>,
}

impl RetryPolicy {
    /// Retry forever with the given backoff.
    pub fn unbounded(backoff: Duration) -> Self {
        Self {
            backoff,
            max_attempts: None,
        }
    }

    /// Retry at most `attempts` times with the given backoff.
    pub fn bounded(backoff: Duration, attempts: u32) -> Self {
        Self {
            backoff,
            max_attempts: Some(attempts),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::unbounded(Duration::from_secs(30))
    }
}

/// Run `op` until it succeeds, sleeping `policy.backoff` between attempts.
///
/// Only the *last* error is surfaced, and only when the policy carries an
/// attempt ceiling and it is exhausted. With an unbounded policy the returned
/// future resolves only on success.
pub async fn retry_with_backoff<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt: u32 = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                attempt += 1;
                if let Some(max) = policy.max_attempts
                    && attempt >= max
                {
                    return Err(error);
                }
                warn!(
                    "request failed ({error}) - waiting {} seconds before retrying",
                    policy.backoff.as_secs()
                );
                tokio::time::sleep(policy.backoff).await;
            }
        }
    }
}
