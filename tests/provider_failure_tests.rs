//! Provider failures must surface as one generic error.
//!
//! Whatever the provider does wrong, clients get a 500 with the same fixed
//! message and no upstream detail.

mod common;

use axum::http::StatusCode;
use common::{spawn_app, spawn_app_with, TestApp};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::{
    matchers::{method, path},
    Mock, ResponseTemplate,
};

const GENERIC: &str = "AI generation failed, please try again later";

fn endpoints() -> Vec<(&'static str, Value)> {
    vec![
        ("/api/chat", json!({"message": "hi"})),
        ("/api/email", json!({"recipient": "Ann", "topic": "lunch"})),
        ("/api/content", json!({"topic": "tea"})),
        ("/api/analyze", json!({"data": "numbers"})),
    ]
}

async fn mount_failure(app: &TestApp, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/anthropic/messages"))
        .respond_with(template)
        .mount(&app.provider)
        .await;
}

async fn assert_generic_failure_everywhere(app: &TestApp, leaked: &str) {
    let key = app.register("a@b.com", Some("pro")).await;
    for (uri, body) in endpoints() {
        let (status, json) = app.post_json(uri, Some(&key), body).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{}", uri);
        assert_eq!(json, json!({"error": GENERIC}), "{}", uri);
        assert!(!json.to_string().contains(leaked), "{} leaked upstream detail", uri);
    }
}

#[tokio::test]
async fn test_provider_error_status_is_generic() {
    let app = spawn_app().await;
    mount_failure(
        &app,
        ResponseTemplate::new(500).set_body_string("upstream exploded: shard-7"),
    )
    .await;

    assert_generic_failure_everywhere(&app, "shard-7").await;
}

#[tokio::test]
async fn test_provider_auth_failure_is_generic() {
    let app = spawn_app().await;
    mount_failure(
        &app,
        ResponseTemplate::new(401).set_body_json(json!({
            "type": "error",
            "error": {"type": "authentication_error", "message": "invalid x-api-key"}
        })),
    )
    .await;

    assert_generic_failure_everywhere(&app, "authentication_error").await;
}

#[tokio::test]
async fn test_malformed_provider_body_is_generic() {
    let app = spawn_app().await;
    mount_failure(&app, ResponseTemplate::new(200).set_body_string("<html>gateway</html>")).await;

    assert_generic_failure_everywhere(&app, "html").await;
}

#[tokio::test]
async fn test_response_without_text_block_is_generic() {
    let app = spawn_app().await;
    mount_failure(
        &app,
        ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"type": "tool_use", "id": "toolu_1", "name": "lookup", "input": {}}]
        })),
    )
    .await;

    assert_generic_failure_everywhere(&app, "toolu_1").await;
}

#[tokio::test]
async fn test_provider_timeout_is_generic() {
    let app = spawn_app_with(|config| config.provider.timeout_secs = 1).await;
    mount_failure(
        &app,
        ResponseTemplate::new(200)
            .set_body_json(common::completion_body("too late"))
            .set_delay(Duration::from_secs(3)),
    )
    .await;
    let key = app.register("a@b.com", None).await;

    let started = std::time::Instant::now();
    let (status, body) = app
        .post_json("/api/chat", Some(&key), json!({"message": "hi"}))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], GENERIC);
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_unreachable_provider_is_generic() {
    let app = spawn_app_with(|config| {
        config.provider.base_url = "http://127.0.0.1:9/anthropic".to_string()
    })
    .await;

    assert_generic_failure_everywhere(&app, "127.0.0.1").await;
}

#[tokio::test]
async fn test_failed_generation_keeps_quota_charge() {
    let app = spawn_app().await;
    mount_failure(&app, ResponseTemplate::new(503)).await;
    let key = app.register("a@b.com", None).await;

    let (status, _) = app
        .post_json("/api/chat", Some(&key), json!({"message": "hi"}))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(app.request_count(&key), 1);
}

#[tokio::test]
async fn test_first_block_without_text_is_generic() {
    let app = spawn_app().await;
    mount_failure(
        &app,
        ResponseTemplate::new(200).set_body_json(json!({
            "content": [
                {"type": "thinking", "thinking": "let me see"},
                {"type": "text", "text": "Final answer"}
            ]
        })),
    )
    .await;

    assert_generic_failure_everywhere(&app, "Final answer").await;
}
