/*!
 * Bounded retry with exponential backoff.
 *
 * A `RetryPolicy` yields the finite schedule of delays between attempts;
 * the `Delay` trait is the time-suspension seam so retry behavior can be
 * tested without waiting.
 */

use std::time::Duration;

use async_trait::async_trait;

/// Exponential backoff schedule: the base delay doubles per retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay_ms: u64,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay_ms,
        }
    }

    /// Total attempts allowed, the first call included.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Backoff before the retry with the given 0-based ordinal. The shift
    /// is clamped so oversized ordinals cannot overflow.
    pub fn delay_for(&self, retry: u32) -> Duration {
        Duration::from_millis(self.base_delay_ms.saturating_mul(1u64 << retry.min(20)))
    }

    /// The full delay schedule, one entry per retry the policy allows.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        (0..self.max_attempts.saturating_sub(1)).map(|retry| self.delay_for(retry))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5, 1000)
    }
}

/// Time suspension capability, injectable for tests
#[async_trait]
pub trait Delay: Send + Sync + std::fmt::Debug {
    async fn sleep(&self, duration: Duration);
}

/// Real delay backed by the tokio timer
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// No-op delay so retry paths run instantly in tests
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDelay;

#[async_trait]
impl Delay for NoDelay {
    async fn sleep(&self, _duration: Duration) {}
}
