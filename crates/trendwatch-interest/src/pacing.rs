//! Pacing between consecutive quota-limited queries.
//!
//! The delay is a policy value injected into the pollers, never an inlined
//! sleep, so tests run with [`PacingPolicy::none`] and real runs take the
//! configured delay plus jitter. `max_attempts` is the retry hook: the
//! current design performs no automatic retries (`max_attempts == 1`), but
//! the knob is part of the policy so a backoff strategy can be introduced
//! without touching the pollers' call sites.

use std::time::Duration;

use rand::Rng;

/// Delay policy applied between every two consecutive outbound queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingPolicy {
    /// Fixed delay component.
    pub base_delay: Duration,
    /// Upper bound of the uniform random component added to `base_delay`.
    pub jitter: Duration,
    /// Total attempts per query (1 = no retry).
    pub max_attempts: u32,
}

impl PacingPolicy {
    #[must_use]
    pub fn new(base_delay: Duration, jitter: Duration) -> Self {
        Self {
            base_delay,
            jitter,
            max_attempts: 1,
        }
    }

    /// Zero-delay policy for tests.
    #[must_use]
    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// The next inter-query delay: `base_delay` plus a uniform draw from
    /// `[0, jitter]`.
    pub fn next_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.jitter.is_zero() {
            return self.base_delay;
        }
        let jitter_ms = u64::try_from(self.jitter.as_millis()).unwrap_or(u64::MAX);
        self.base_delay + Duration::from_millis(rng.random_range(0..=jitter_ms))
    }

    /// Sleeps for [`PacingPolicy::next_delay`]. No-op for a zero delay.
    pub async fn pause<R: Rng + ?Sized>(&self, rng: &mut R) {
        let delay = self.next_delay(rng);
        if !delay.is_zero() {
            tracing::debug!(delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX), "pacing before next query");
            tokio::time::sleep(delay).await;
        }
    }
}
