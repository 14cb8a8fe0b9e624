//! Short-window burst limiting per account.
//!
//! This is separate from the daily quota: it smooths request spikes using a
//! token bucket (via the governor crate). Every account gets its own bucket
//! with the same configured quota, created lazily on first use.

use dashmap::DashMap;
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter as GovernorRateLimiter,
};
use nonzero_ext::nonzero;
use std::num::NonZeroU32;
use std::sync::Arc;

use crate::core::config::RateLimitConfig;
use crate::core::error::AppError;
use crate::core::logging::key_prefix;

/// Type alias for the rate limiter instance
type RateLimiterInstance = Arc<GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Per-account token bucket limiter.
pub struct BurstLimiter {
    quota: Quota,
    limiters: DashMap<String, RateLimiterInstance>,
}

impl BurstLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        let quota = Quota::per_second(
            NonZeroU32::new(config.requests_per_second).unwrap_or(nonzero!(1u32)),
        )
        .allow_burst(NonZeroU32::new(config.burst_size).unwrap_or(nonzero!(10u32)));

        Self {
            quota,
            limiters: DashMap::new(),
        }
    }

    /// Check if a request is allowed for the given account key.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the request is allowed
    /// * `Err(AppError::RateLimitExceeded)` if the burst is exhausted
    pub fn check(&self, key: &str) -> Result<(), AppError> {
        let limiter = self
            .limiters
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(GovernorRateLimiter::direct(self.quota)))
            .clone();

        limiter.check().map_err(|_| {
            tracing::warn!(account_key_prefix = key_prefix(key), "Burst limit exceeded");
            AppError::RateLimitExceeded("Too many requests, slow down".to_string())
        })
    }

    /// Number of accounts with an active bucket.
    pub fn tracked_keys(&self) -> usize {
        self.limiters.len()
    }
}
