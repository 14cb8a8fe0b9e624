//! Shared fixtures for the HTTP-level tests.
//!
//! Every app is wired to a wiremock provider, an in-memory store and a
//! mock clock so tests control both the upstream and the calendar.

#![allow(dead_code)]

use ai_agent_gateway::{
    build_router,
    core::{
        config::{ProviderConfig, RateLimitConfig, ServerConfig},
        init_metrics, AppConfig, MockClock,
    },
    services::{hash_key, AccountStore, InMemoryAccountStore, SecureKeyGenerator},
    AppState,
};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

pub struct TestApp {
    pub router: Router,
    pub provider: MockServer,
    pub store: Arc<InMemoryAccountStore>,
    pub clock: MockClock,
}

pub fn test_config(base_url: &str, timeout_secs: u64) -> AppConfig {
    AppConfig {
        server: ServerConfig::default(),
        provider: ProviderConfig {
            base_url: base_url.to_string(),
            api_key: "provider-secret".to_string(),
            model: "test-model".to_string(),
            timeout_secs,
        },
        verify_ssl: false,
        burst_limit: None,
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Build an app, letting the caller adjust the config first.
pub async fn spawn_app_with(customize: impl FnOnce(&mut AppConfig)) -> TestApp {
    init_metrics();

    let provider = MockServer::start().await;
    let mut config = test_config(&format!("{}/anthropic", provider.uri()), 2);
    customize(&mut config);

    let store = Arc::new(InMemoryAccountStore::new());
    let clock = MockClock::new(Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap());

    let state = Arc::new(AppState::new(
        &config,
        reqwest::Client::new(),
        store.clone(),
        Arc::new(clock.clone()),
        Arc::new(SecureKeyGenerator),
    ));

    TestApp {
        router: build_router(state),
        provider,
        store,
        clock,
    }
}

pub fn burst_limit(requests_per_second: u32, burst_size: u32) -> Option<RateLimitConfig> {
    Some(RateLimitConfig {
        requests_per_second,
        burst_size,
    })
}

/// Provider body carrying a single text block.
pub fn completion_body(text: &str) -> Value {
    json!({
        "id": "msg_test",
        "type": "message",
        "role": "assistant",
        "content": [{"type": "text", "text": text}],
        "stop_reason": "end_turn"
    })
}

impl TestApp {
    /// Answer every completion with `text`.
    pub async fn mock_completion(&self, text: &str) {
        Mock::given(method("POST"))
            .and(path("/anthropic/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(text)))
            .mount(&self.provider)
            .await;
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }

    pub async fn post_json(&self, uri: &str, key: Option<&str>, body: Value) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(key) = key {
            builder = builder.header("x-api-key", key);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn get(&self, uri: &str, key: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(key) = key {
            builder = builder.header("x-api-key", key);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// Register an account and return its access key.
    pub async fn register(&self, email: &str, plan: Option<&str>) -> String {
        let mut body = json!({ "email": email });
        if let Some(plan) = plan {
            body["plan"] = json!(plan);
        }
        let (status, json) = self.post_json("/api/auth/register", None, body).await;
        assert_eq!(status, StatusCode::OK, "registration failed: {}", json);
        json["apiKey"].as_str().unwrap().to_string()
    }

    /// Overwrite today's request count for `key`.
    pub fn set_request_count(&self, key: &str, count: u32) {
        let mut account = self.store.get(&hash_key(key)).unwrap();
        account.request_count = count;
        self.store.put(account);
    }

    pub fn request_count(&self, key: &str) -> u32 {
        self.store.get(&hash_key(key)).unwrap().request_count
    }
}
