//! API layer for the gateway.
//!
//! This module contains the HTTP handlers, authentication middleware,
//! request/response models, OpenAPI docs and router assembly.

pub mod auth;
pub mod docs;
pub mod handlers;
pub mod health;
pub mod models;
pub mod routes;

// Re-export commonly used types
pub use auth::{enforce_burst_limit, extract_access_key, require_account, AuthenticatedAccount};
pub use docs::ApiDoc;
pub use handlers::{analyze, chat, content, email, metrics_handler, register, user_info, AppState};
pub use health::health;
pub use models::*;
pub use routes::build_router;
