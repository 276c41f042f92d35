//! Fixed-delay retry policy for transient batch failures.
//!
//! The policy is intentionally flat: a short fixed delay and a small bounded
//! attempt count, with no exponential backoff. The signer is a wallet held
//! open by a waiting user — either the infrastructure hiccup clears within a
//! couple of seconds or the batch is recorded as failed and the run moves on.

use std::time::Duration;

/// Bounded fixed-delay retry policy.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts per batch, including the first (minimum 1).
    pub max_attempts: u32,
    /// Fixed pause before each additional attempt.
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    /// One extra attempt after a 2-second pause.
    fn default() -> Self {
        Self {
            max_attempts: 2,
            retry_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries (single attempt per batch).
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            retry_delay: Duration::ZERO,
        }
    }

    /// Returns the pause before the next attempt after `attempt` tries have
    /// failed, or `None` once attempts are exhausted.
    pub fn next_delay(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts {
            None
        } else {
            Some(self.retry_delay)
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
