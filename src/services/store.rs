//! Account records and the storage abstraction behind the key registry.
//!
//! The registry only needs `get`/`put` by key hash, so a persistent backend
//! can replace [`InMemoryAccountStore`] without touching handler logic.

use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::core::config::FREE_DAILY_LIMIT;

/// Tier determining the daily quota ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    /// Capped at [`FREE_DAILY_LIMIT`] requests per UTC day
    #[default]
    Free,
    /// Never capped
    Pro,
}

impl Plan {
    /// Daily ceiling, or `None` when unlimited.
    pub const fn daily_limit(self) -> Option<u32> {
        match self {
            Plan::Free => Some(FREE_DAILY_LIMIT),
            Plan::Pro => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Pro => "pro",
        }
    }

    pub fn limits(self) -> Limits {
        match self.daily_limit() {
            Some(monthly) => Limits::Capped { monthly },
            None => Limits::Unlimited { unlimited: true },
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Plan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Plan::Free),
            "pro" => Ok(Plan::Pro),
            other => Err(format!("unknown plan: {}", other)),
        }
    }
}

/// Limits reported at registration.
///
/// The free-plan field keeps its historical `monthly` name even though the
/// ceiling resets daily; existing clients read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum Limits {
    Capped { monthly: u32 },
    Unlimited { unlimited: bool },
}

/// A registered caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// SHA-256 hex digest of the access key; the plaintext is never stored
    pub key_hash: String,
    pub email: String,
    pub plan: Plan,
    /// Requests made on `last_reset_date`
    pub request_count: u32,
    pub last_reset_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Requests counted for `today`; a stale counter reads as zero.
    pub fn requests_on(&self, today: NaiveDate) -> u32 {
        if self.last_reset_date == today {
            self.request_count
        } else {
            0
        }
    }
}

/// Storage for account records, keyed by access key hash.
pub trait AccountStore: Send + Sync + 'static {
    fn get(&self, key_hash: &str) -> Option<Account>;

    /// Insert or replace the record stored under `account.key_hash`.
    fn put(&self, account: Account);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-lifetime store; empty on startup.
#[derive(Default)]
pub struct InMemoryAccountStore {
    accounts: DashMap<String, Account>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountStore for InMemoryAccountStore {
    fn get(&self, key_hash: &str) -> Option<Account> {
        self.accounts.get(key_hash).map(|entry| entry.value().clone())
    }

    fn put(&self, account: Account) {
        self.accounts.insert(account.key_hash.clone(), account);
    }

    fn len(&self) -> usize {
        self.accounts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn account(key_hash: &str) -> Account {
        Account {
            key_hash: key_hash.to_string(),
            email: "a@b.com".to_string(),
            plan: Plan::Free,
            request_count: 0,
            last_reset_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_plan_parsing() {
        assert_eq!("free".parse::<Plan>().unwrap(), Plan::Free);
        assert_eq!("pro".parse::<Plan>().unwrap(), Plan::Pro);
        assert!("enterprise".parse::<Plan>().is_err());
        assert!("Pro".parse::<Plan>().is_err());
    }

    #[test]
    fn test_plan_limits_serialization() {
        assert_eq!(
            serde_json::to_value(Plan::Free.limits()).unwrap(),
            serde_json::json!({ "monthly": 50 })
        );
        assert_eq!(
            serde_json::to_value(Plan::Pro.limits()).unwrap(),
            serde_json::json!({ "unlimited": true })
        );
    }

    #[test]
    fn test_plan_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Plan::Pro).unwrap(), "pro");
        assert_eq!(Plan::Free.to_string(), "free");
    }

    #[test]
    fn test_requests_on_stale_day_reads_zero() {
        let mut acc = account("h");
        acc.request_count = 7;
        let day = acc.last_reset_date;

        assert_eq!(acc.requests_on(day), 7);
        assert_eq!(acc.requests_on(day.succ_opt().unwrap()), 0);
    }

    #[test]
    fn test_store_get_put() {
        let store = InMemoryAccountStore::new();
        assert!(store.is_empty());
        assert!(store.get("h1").is_none());

        store.put(account("h1"));
        assert_eq!(store.get("h1").unwrap().email, "a@b.com");

        let mut updated = account("h1");
        updated.request_count = 3;
        store.put(updated);

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("h1").unwrap().request_count, 3);
    }
}
