//! Configuration management for the gateway.
//!
//! All settings come from environment variables (optionally seeded from a
//! `.env` file). The provider credential is the only required value; startup
//! fails fast without it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Daily request ceiling for free-plan accounts.
pub const FREE_DAILY_LIMIT: u32 = 50;

/// Maximum output size requested from the provider on every completion.
pub const MAX_OUTPUT_TOKENS: u32 = 2048;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port)
    #[serde(default)]
    pub server: ServerConfig,

    /// Remote completion provider
    pub provider: ProviderConfig,

    /// Whether to verify SSL certificates for provider requests
    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: bool,

    /// Optional short-window limiter applied per account
    #[serde(default)]
    pub burst_limit: Option<RateLimitConfig>,
}

/// Configuration for the remote completion provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL; `/messages` is appended for completions
    #[serde(default = "default_provider_base_url")]
    pub base_url: String,

    /// Bearer credential sent to the provider
    pub api_key: String,

    /// Model identifier sent with every completion
    #[serde(default = "default_model")]
    pub model: String,

    /// Upper bound on a single completion round-trip
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Token bucket settings for the burst limiter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Sustained requests per second
    pub requests_per_second: u32,

    /// Maximum burst size (allows temporary spikes)
    #[serde(default = "default_burst")]
    pub burst_size: u32,
}

/// Server-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_verify_ssl() -> bool {
    true
}

fn default_provider_base_url() -> String {
    "https://api.minimax.io/anthropic".to_string()
}

fn default_model() -> String {
    "MiniMax-M2.1".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_burst() -> u32 {
    10
}

impl AppConfig {
    /// Build configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when neither `PROVIDER_API_KEY` nor `MINIMAX_API_KEY`
    /// is set, or when a numeric variable cannot be parsed.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ai_agent_gateway::core::config::AppConfig;
    ///
    /// let config = AppConfig::from_env().expect("Failed to load config");
    /// ```
    pub fn from_env() -> Result<Self> {
        let api_key = non_empty_var("PROVIDER_API_KEY")
            .or_else(|| non_empty_var("MINIMAX_API_KEY"))
            .context("PROVIDER_API_KEY environment variable is required")?;

        let mut server = ServerConfig::default();
        if let Some(host) = non_empty_var("HOST") {
            server.host = host;
        }
        if let Some(port) = non_empty_var("PORT") {
            server.port = port
                .parse()
                .with_context(|| format!("Invalid PORT value: {}", port))?;
        }

        let timeout_secs = match non_empty_var("PROVIDER_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .with_context(|| format!("Invalid PROVIDER_TIMEOUT_SECS value: {}", raw))?,
            None => default_timeout_secs(),
        };

        let provider = ProviderConfig {
            base_url: non_empty_var("PROVIDER_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(default_provider_base_url),
            api_key,
            model: non_empty_var("PROVIDER_MODEL").unwrap_or_else(default_model),
            timeout_secs,
        };

        let verify_ssl = non_empty_var("VERIFY_SSL")
            .map(|v| str_to_bool(&v))
            .unwrap_or_else(default_verify_ssl);

        let burst_limit = match non_empty_var("BURST_RATE_LIMIT_RPS") {
            Some(raw) => {
                let requests_per_second: u32 = raw
                    .parse()
                    .with_context(|| format!("Invalid BURST_RATE_LIMIT_RPS value: {}", raw))?;
                let burst_size = match non_empty_var("BURST_RATE_LIMIT_BURST") {
                    Some(b) => b
                        .parse()
                        .with_context(|| format!("Invalid BURST_RATE_LIMIT_BURST value: {}", b))?,
                    None => default_burst(),
                };
                Some(RateLimitConfig {
                    requests_per_second,
                    burst_size,
                })
            }
            None => None,
        };

        Ok(Self {
            server,
            provider,
            verify_ssl,
            burst_limit,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Convert string to boolean.
///
/// Accepts: "true", "1", "yes", "on" (case-insensitive)
fn str_to_bool(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "PROVIDER_API_KEY",
        "MINIMAX_API_KEY",
        "HOST",
        "PORT",
        "PROVIDER_BASE_URL",
        "PROVIDER_MODEL",
        "PROVIDER_TIMEOUT_SECS",
        "VERIFY_SSL",
        "BURST_RATE_LIMIT_RPS",
        "BURST_RATE_LIMIT_BURST",
    ];

    fn clear_env() {
        for var in VARS {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }

    #[test]
    fn test_str_to_bool() {
        assert!(str_to_bool("true"));
        assert!(str_to_bool("TRUE"));
        assert!(str_to_bool("1"));
        assert!(str_to_bool("yes"));
        assert!(str_to_bool("On"));
        assert!(!str_to_bool("false"));
        assert!(!str_to_bool("0"));
        assert!(!str_to_bool(""));
        assert!(!str_to_bool("invalid"));
    }

    #[test]
    fn test_default_values() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
    }

    #[test]
    #[serial]
    fn test_missing_provider_key_fails_fast() {
        clear_env();
        let result = AppConfig::from_env();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("PROVIDER_API_KEY"));
    }

    #[test]
    #[serial]
    fn test_defaults_with_only_provider_key() {
        clear_env();
        unsafe {
            std::env::set_var("PROVIDER_API_KEY", "sk-provider");
        }

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.provider.api_key, "sk-provider");
        assert_eq!(config.provider.base_url, "https://api.minimax.io/anthropic");
        assert_eq!(config.provider.model, "MiniMax-M2.1");
        assert_eq!(config.provider.timeout_secs, 60);
        assert_eq!(config.server.port, 3000);
        assert!(config.verify_ssl);
        assert!(config.burst_limit.is_none());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_legacy_minimax_key_is_accepted() {
        clear_env();
        unsafe {
            std::env::set_var("MINIMAX_API_KEY", "sk-legacy");
        }

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.provider.api_key, "sk-legacy");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_env_var_overrides() {
        clear_env();
        unsafe {
            std::env::set_var("PROVIDER_API_KEY", "sk-provider");
            std::env::set_var("HOST", "127.0.0.1");
            std::env::set_var("PORT", "9999");
            std::env::set_var("PROVIDER_BASE_URL", "http://localhost:8000/anthropic/");
            std::env::set_var("PROVIDER_MODEL", "test-model");
            std::env::set_var("PROVIDER_TIMEOUT_SECS", "5");
            std::env::set_var("VERIFY_SSL", "false");
            std::env::set_var("BURST_RATE_LIMIT_RPS", "3");
        }

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9999);
        assert_eq!(config.provider.base_url, "http://localhost:8000/anthropic");
        assert_eq!(config.provider.model, "test-model");
        assert_eq!(config.provider.timeout_secs, 5);
        assert!(!config.verify_ssl);

        let burst = config.burst_limit.unwrap();
        assert_eq!(burst.requests_per_second, 3);
        assert_eq!(burst.burst_size, 10);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_port_is_rejected() {
        clear_env();
        unsafe {
            std::env::set_var("PROVIDER_API_KEY", "sk-provider");
            std::env::set_var("PORT", "not-a-port");
        }

        assert!(AppConfig::from_env().is_err());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_zero_timeout_is_rejected() {
        clear_env();
        unsafe {
            std::env::set_var("PROVIDER_API_KEY", "sk-provider");
            std::env::set_var("PROVIDER_TIMEOUT_SECS", "0");
        }

        let err = AppConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("PROVIDER_TIMEOUT_SECS"));

        clear_env();
    }
}
