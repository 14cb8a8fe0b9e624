//! AI Agent Gateway - access-key authenticated text generation
//!
//! This library provides a small HTTP service that hands out access keys,
//! counts requests against a per-account daily quota, and forwards
//! templated prompts to an Anthropic-style completion provider.
//!
//! - **Key Registry**: Issue `ak_` access keys and resolve them per request
//! - **Quota Tracking**: 50 requests per UTC day on the free plan, unlimited on pro
//! - **Prompt Templates**: Chat, email, content and analysis templates with defaults
//! - **Completion Client**: `/messages` calls with a timeout and a generic failure surface
//! - **Metrics & Monitoring**: Prometheus metrics for observability
//!
//! # Architecture
//!
//! The codebase is organized into three main layers:
//!
//! - [`core`]: Core functionality (config, clock, errors, logging, metrics, middleware)
//! - [`api`]: HTTP handlers, auth middleware, request/response models, router
//! - [`services`]: Business logic (accounts, quota, prompts, completions)
//!
//! # Configuration
//!
//! The server requires the following environment variable:
//! - `PROVIDER_API_KEY` (or `MINIMAX_API_KEY`): Completion provider credential
//!
//! Optional environment variables:
//! - `HOST`: Server bind address (default: 0.0.0.0)
//! - `PORT`: Server port (default: 3000)
//! - `PROVIDER_BASE_URL`, `PROVIDER_MODEL`, `PROVIDER_TIMEOUT_SECS`
//! - `VERIFY_SSL`: Verify SSL certificates for the provider (default: true)
//! - `BURST_RATE_LIMIT_RPS`, `BURST_RATE_LIMIT_BURST`: Per-account burst limiter

pub mod api;
pub mod core;
pub mod services;

// Re-export commonly used types for convenience
pub use api::{build_router, ApiDoc, AppState};
pub use core::{AppConfig, AppError, Result};
pub use services::{CompletionClient, KeyRegistry, QuotaTracker};
