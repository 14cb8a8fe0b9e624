//! Per-account daily quota.
//!
//! The counter resets on the first call of each UTC day. Check and increment
//! happen under a per-account lock so two concurrent calls can never both
//! pass the ceiling; the lock is released before the caller does any
//! generation work.

use dashmap::DashMap;
use serde::{Serialize, Serializer};
use std::sync::Arc;
use tokio::sync::Mutex;
use utoipa::ToSchema;

use crate::core::clock::Clock;
use crate::core::error::{AppError, AuthError, Result};
use crate::services::store::{Account, AccountStore};

/// Requests left today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remaining {
    Count(u32),
    Unlimited,
}

impl Serialize for Remaining {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Remaining::Count(n) => serializer.serialize_u32(*n),
            Remaining::Unlimited => serializer.serialize_str("unlimited"),
        }
    }
}

/// Usage accounting returned with every generation response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[schema(example = json!({"requests": 3, "remaining": 47}))]
pub struct Usage {
    /// Requests used today, including this one
    pub requests: u32,
    /// Requests left today, or "unlimited"
    #[schema(value_type = Object)]
    pub remaining: Remaining,
}

impl Usage {
    pub fn for_account(account: &Account, requests: u32) -> Self {
        let remaining = match account.plan.daily_limit() {
            Some(limit) => Remaining::Count(limit.saturating_sub(requests)),
            None => Remaining::Unlimited,
        };
        Self {
            requests,
            remaining,
        }
    }
}

/// Outcome of [`QuotaTracker::check_and_consume`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaDecision {
    /// The request was counted
    Allowed(Usage),
    /// The ceiling was already reached; nothing was counted
    Exhausted,
}

impl QuotaDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, QuotaDecision::Allowed(_))
    }
}

pub struct QuotaTracker {
    store: Arc<dyn AccountStore>,
    clock: Arc<dyn Clock>,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl QuotaTracker {
    pub fn new(store: Arc<dyn AccountStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            locks: DashMap::new(),
        }
    }

    fn lock_for(&self, key_hash: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(key_hash.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Reset the counter if the day changed, then count one request unless
    /// a capped plan has already reached its ceiling.
    ///
    /// The account is re-read from the store under the lock, so a stale
    /// snapshot held by the caller cannot cause a double count.
    pub async fn check_and_consume(&self, account: &Account) -> Result<QuotaDecision> {
        let lock = self.lock_for(&account.key_hash);
        let _guard = lock.lock().await;

        let mut current = self
            .store
            .get(&account.key_hash)
            .ok_or(AppError::Unauthorized(AuthError::Invalid))?;

        let today = self.clock.today();
        if current.last_reset_date != today {
            tracing::debug!(
                previous = %current.last_reset_date,
                today = %today,
                "Resetting daily request counter"
            );
            current.request_count = 0;
            current.last_reset_date = today;
        }

        if let Some(limit) = current.plan.daily_limit() {
            if current.request_count >= limit {
                // Persist a pending day reset even when rejecting.
                self.store.put(current);
                return Ok(QuotaDecision::Exhausted);
            }
        }

        current.request_count += 1;
        let usage = Usage::for_account(&current, current.request_count);
        self.store.put(current);

        Ok(QuotaDecision::Allowed(usage))
    }

    /// Today's usage without counting a request.
    pub fn usage(&self, account: &Account) -> Usage {
        Usage::for_account(account, account.requests_on(self.clock.today()))
    }
}
