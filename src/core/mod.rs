//! Core functionality for the gateway.
//!
//! This module contains fundamental components used throughout the application:
//! - Configuration management
//! - Error handling
//! - Clock abstraction
//! - Logging and metrics
//! - HTTP middleware and burst rate limiting

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod rate_limiter;

// Re-export commonly used types
pub use clock::{Clock, MockClock, SystemClock};
pub use config::{AppConfig, ProviderConfig, RateLimitConfig, ServerConfig};
pub use error::{AppError, AuthError, ErrorBody, Result};
pub use logging::{generate_request_id, get_request_id, init_tracing, REQUEST_ID};
pub use metrics::{get_metrics, init_metrics, Metrics};
pub use middleware::{request_id_middleware, MetricsMiddleware};
pub use rate_limiter::BurstLimiter;
