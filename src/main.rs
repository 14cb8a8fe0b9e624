//! AI Agent Gateway - Main entry point
//!
//! This binary loads configuration from the environment, builds the router
//! and serves it until the process is stopped.

use ai_agent_gateway::{
    build_router,
    core::{init_metrics, init_tracing, AppConfig},
    AppState,
};
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

fn main() -> Result<()> {
    // Load .env file if present (before reading any environment variables)
    dotenvy::dotenv().ok();

    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or_else(|| detect_cpu_limit().unwrap_or(1));

    println!("Tokio runtime: using {} worker threads", worker_threads);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    init_tracing();
    init_metrics();

    let config = AppConfig::from_env()?;
    let http_client = create_http_client(&config)?;

    tracing::info!(
        provider = %config.provider.base_url,
        model = %config.provider.model,
        timeout_secs = config.provider.timeout_secs,
        burst_limit = config.burst_limit.is_some(),
        "Configuration loaded"
    );

    let state = Arc::new(AppState::in_memory(&config, http_client));
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "invalid bind address {}:{}",
                config.server.host, config.server.port
            )
        })?;

    tracing::info!("Starting AI Agent Gateway on {}", addr);
    tracing::info!("Generation API: /api/chat, /api/email, /api/content, /api/analyze");
    tracing::info!("Accounts: /api/auth/register, /api/user");
    tracing::info!("Swagger UI: /swagger-ui");
    tracing::info!("Metrics endpoint: /metrics");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create HTTP client with connection pooling.
///
/// The client timeout sits a little above the per-completion timeout so the
/// completion client's own deadline is the one that fires.
fn create_http_client(config: &AppConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .danger_accept_invalid_certs(!config.verify_ssl)
        .timeout(Duration::from_secs(config.provider.timeout_secs + 5))
        .pool_max_idle_per_host(32)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .build()
        .context("Failed to build HTTP client")
}

/// Detect CPU limit from cgroup (for containerized environments)
fn detect_cpu_limit() -> Option<usize> {
    // cgroup v2
    if let Ok(max) = std::fs::read_to_string("/sys/fs/cgroup/cpu.max") {
        let parts: Vec<&str> = max.split_whitespace().collect();
        if let [quota, period] = parts.as_slice() {
            if let (Ok(quota), Ok(period)) = (quota.parse::<i64>(), period.parse::<i64>()) {
                return cores_from_quota(quota, period);
            }
        }
    }

    // cgroup v1
    let read = |path: &str| {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| s.trim().parse::<i64>().ok())
    };
    cores_from_quota(
        read("/sys/fs/cgroup/cpu/cpu.cfs_quota_us")?,
        read("/sys/fs/cgroup/cpu/cpu.cfs_period_us")?,
    )
}

fn cores_from_quota(quota: i64, period: i64) -> Option<usize> {
    if quota > 0 && period > 0 {
        let cores = ((quota as f64 / period as f64).ceil() as usize).max(1);
        println!("Detected CPU limit from cgroup: {} cores", cores);
        Some(cores)
    } else {
        None
    }
}
