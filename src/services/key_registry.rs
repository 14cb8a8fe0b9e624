//! Access key issuance and resolution.

use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::core::clock::Clock;
use crate::core::error::{AppError, AuthError, Result};
use crate::services::store::{Account, AccountStore, Limits, Plan};

/// Prefix carried by every issued access key.
pub const ACCESS_KEY_PREFIX: &str = "ak_";

/// Hash an access key using SHA-256.
pub fn hash_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Source of fresh access keys.
pub trait KeyGenerator: Send + Sync + 'static {
    fn generate(&self) -> String;
}

/// `ak_` followed by 128 bits of OS randomness, hex encoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecureKeyGenerator;

impl KeyGenerator for SecureKeyGenerator {
    fn generate(&self) -> String {
        let mut bytes = [0u8; 16];
        OsRng.fill_bytes(&mut bytes);
        format!("{}{}", ACCESS_KEY_PREFIX, hex::encode(bytes))
    }
}

/// Result of a successful registration. The plaintext key appears only here.
#[derive(Debug, Clone)]
pub struct Registration {
    pub access_key: String,
    pub plan: Plan,
    pub limits: Limits,
}

/// Maps issued access keys to accounts.
pub struct KeyRegistry {
    store: Arc<dyn AccountStore>,
    generator: Arc<dyn KeyGenerator>,
    clock: Arc<dyn Clock>,
}

impl KeyRegistry {
    pub fn new(
        store: Arc<dyn AccountStore>,
        generator: Arc<dyn KeyGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            generator,
            clock,
        }
    }

    /// Create an account and issue its access key.
    ///
    /// `plan` defaults to free when absent.
    ///
    /// # Errors
    ///
    /// * `AppError::BadRequest("Email required")` for a missing or empty email
    /// * `AppError::BadRequest("Invalid plan")` for anything but `free`/`pro`
    pub fn register(&self, email: Option<&str>, plan: Option<&str>) -> Result<Registration> {
        let email = email
            .filter(|e| !e.is_empty())
            .ok_or_else(|| AppError::BadRequest("Email required".to_string()))?;

        let plan = match plan {
            Some(raw) => raw.parse::<Plan>().map_err(|e| {
                tracing::debug!(error = %e, "Registration rejected");
                AppError::BadRequest("Invalid plan".to_string())
            })?,
            None => Plan::default(),
        };

        let (access_key, key_hash) = loop {
            let candidate = self.generator.generate();
            let candidate_hash = hash_key(&candidate);
            if self.store.get(&candidate_hash).is_none() {
                break (candidate, candidate_hash);
            }
            tracing::warn!("Generated access key collided with an existing account, regenerating");
        };

        let now = self.clock.now();
        self.store.put(Account {
            key_hash,
            email: email.to_string(),
            plan,
            request_count: 0,
            last_reset_date: now.date_naive(),
            created_at: now,
        });

        tracing::info!(plan = %plan, "Account registered");

        Ok(Registration {
            access_key,
            plan,
            limits: plan.limits(),
        })
    }

    /// Look up the account owning `access_key`.
    ///
    /// # Errors
    ///
    /// * `AuthError::Missing` when no key was supplied
    /// * `AuthError::Invalid` when the key is not registered
    pub fn resolve(&self, access_key: Option<&str>) -> Result<Account> {
        let access_key = access_key
            .filter(|k| !k.is_empty())
            .ok_or(AppError::Unauthorized(AuthError::Missing))?;

        self.store
            .get(&hash_key(access_key))
            .ok_or(AppError::Unauthorized(AuthError::Invalid))
    }

    pub fn account_count(&self) -> usize {
        self.store.len()
    }
}
