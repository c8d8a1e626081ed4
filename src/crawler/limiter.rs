//! Outbound request throttling
//!
//! One request per interval, enforced by a `governor` quota, followed by a
//! random pause so consecutive requests are spaced by at least the interval
//! and usually more.

use crate::config::RateLimitConfig;
use crate::ConfigError;
use governor::clock::{Clock, DefaultClock};
use governor::state::{direct::NotKeyed, InMemoryState};
use governor::{Quota, RateLimiter as Governor};
use std::time::Duration;
use thiserror::Error;

/// The quota had no permit left
#[derive(Debug, Clone, Copy, Error)]
#[error("rate limit exceeded, next permit in {retry_after:?}")]
pub struct RateLimitDenied {
    pub retry_after: Duration,
}

/// Single-permit rate limiter with post-acquire jitter
pub struct RateLimiter {
    quota: Governor<NotKeyed, InMemoryState, DefaultClock>,
    clock: DefaultClock,
    interval: Duration,
    max_delay: Duration,
}

impl RateLimiter {
    /// Creates a limiter allowing one request per `interval`
    ///
    /// After each permit the caller is held for a random delay in
    /// `[interval, max_delay]`.
    pub fn new(interval: Duration, max_delay: Duration) -> Result<Self, ConfigError> {
        let quota = Quota::with_period(interval).ok_or_else(|| {
            ConfigError::Validation("rate limit interval must be non-zero".to_string())
        })?;

        Ok(Self {
            quota: Governor::direct(quota),
            clock: DefaultClock::default(),
            interval,
            max_delay: max_delay.max(interval),
        })
    }

    pub fn from_config(config: &RateLimitConfig) -> Result<Self, ConfigError> {
        Self::new(
            Duration::from_millis(config.interval_ms),
            Duration::from_millis(config.max_delay_ms),
        )
    }

    /// Takes the interval's permit without waiting
    pub fn try_acquire(&self) -> Result<(), RateLimitDenied> {
        self.quota.check().map_err(|not_until| RateLimitDenied {
            retry_after: not_until.wait_time_from(self.clock.now()),
        })
    }

    /// Takes the interval's permit, then sleeps for the jitter delay
    ///
    /// Fails immediately, without sleeping, when no permit is available.
    /// Returns the delay that was slept.
    pub async fn acquire(&self) -> Result<Duration, RateLimitDenied> {
        self.try_acquire()?;

        let delay = self.jitter();
        tracing::debug!("Waiting {:.3} seconds before next request", delay.as_secs_f64());
        tokio::time::sleep(delay).await;

        Ok(delay)
    }

    /// Draws a delay uniformly from `[interval, max_delay]`
    fn jitter(&self) -> Duration {
        let min = self.interval.as_millis() as u64;
        let max = self.max_delay.as_millis() as u64;
        Duration::from_millis(fastrand::u64(min..=max))
    }
}
