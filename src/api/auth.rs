//! Access key authentication.
//!
//! Keys are read from `x-api-key`, falling back to `Authorization: Bearer`.
//! [`require_account`] resolves the key once per request and hands the
//! account to handlers through a request extension.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::api::handlers::AppState;
use crate::core::error::Result;
use crate::core::logging::key_prefix;
use crate::services::Account;

/// Account resolved by [`require_account`].
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount(pub Account);

/// Extract the access key, preferring `x-api-key`.
pub fn extract_access_key(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .or_else(|| extract_bearer(headers))
}

/// Extract Bearer token from Authorization header.
fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
}

/// Reject requests without a registered access key.
///
/// The daily quota and burst limiter are left to the generation routes
/// because `/api/user` consumes neither.
pub async fn require_account(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let account = state
        .registry
        .resolve(extract_access_key(request.headers()))
        .inspect_err(|e| tracing::debug!(error = %e, path = %request.uri().path(), "Authentication failed"))?;

    tracing::debug!(
        account_key_prefix = key_prefix(&account.key_hash),
        plan = %account.plan,
        "Authentication successful"
    );

    request
        .extensions_mut()
        .insert(AuthenticatedAccount(account));
    Ok(next.run(request).await)
}

/// Apply the burst limiter, when configured, to an authenticated request.
///
/// Must run inside [`require_account`]. A request without an
/// [`AuthenticatedAccount`] passes through untouched.
pub async fn enforce_burst_limit(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response> {
    if let (Some(limiter), Some(AuthenticatedAccount(account))) = (
        &state.burst_limiter,
        request.extensions().get::<AuthenticatedAccount>(),
    ) {
        limiter.check(&account.key_hash)?;
    }

    Ok(next.run(request).await)
}
