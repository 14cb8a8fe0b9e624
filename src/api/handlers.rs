//! HTTP request handlers for the gateway API.
//!
//! Generation handlers share one pipeline: the auth middleware has already
//! resolved the account, then quota is consumed, required fields are
//! checked, the prompt is built and the completion client is called.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use prometheus::{Encoder, TextEncoder};
use std::sync::Arc;

use crate::api::auth::AuthenticatedAccount;
use crate::api::models::*;
use crate::core::clock::{Clock, SystemClock};
use crate::core::config::AppConfig;
use crate::core::error::{AppError, ErrorBody, Result};
use crate::core::logging::key_prefix;
use crate::core::metrics::get_metrics;
use crate::core::rate_limiter::BurstLimiter;
use crate::services::{
    build_prompt, Account, AccountStore, AnalysisKind, CompletionClient, ContentKind, EmailKind,
    InMemoryAccountStore, KeyGenerator, KeyRegistry, Prompt, PromptRequest, QuotaDecision,
    QuotaTracker, SecureKeyGenerator, Usage,
};

/// Shared application state.
pub struct AppState {
    pub registry: KeyRegistry,
    pub quota: QuotaTracker,
    pub completion: CompletionClient,
    pub burst_limiter: Option<BurstLimiter>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// State with explicit storage, clock and key generator.
    pub fn new(
        config: &AppConfig,
        http_client: reqwest::Client,
        store: Arc<dyn AccountStore>,
        clock: Arc<dyn Clock>,
        key_generator: Arc<dyn KeyGenerator>,
    ) -> Self {
        Self {
            registry: KeyRegistry::new(store.clone(), key_generator, clock.clone()),
            quota: QuotaTracker::new(store, clock.clone()),
            completion: CompletionClient::new(&config.provider, http_client),
            burst_limiter: config.burst_limit.as_ref().map(BurstLimiter::new),
            clock,
        }
    }

    /// Production wiring: empty in-memory store, wall clock, secure keys.
    pub fn in_memory(config: &AppConfig, http_client: reqwest::Client) -> Self {
        Self::new(
            config,
            http_client,
            Arc::new(InMemoryAccountStore::new()),
            Arc::new(SystemClock),
            Arc::new(SecureKeyGenerator),
        )
    }

    async fn consume_quota(&self, account: &Account) -> Result<Usage> {
        match self.quota.check_and_consume(account).await? {
            QuotaDecision::Allowed(usage) => Ok(usage),
            QuotaDecision::Exhausted => {
                tracing::warn!(
                    account_key_prefix = key_prefix(&account.key_hash),
                    plan = %account.plan,
                    "Daily quota exhausted"
                );
                get_metrics()
                    .quota_rejections
                    .with_label_values(&[account.plan.as_str()])
                    .inc();
                Err(AppError::daily_quota_exhausted())
            }
        }
    }

    async fn generate(&self, request: &PromptRequest) -> Result<String> {
        let capability = request.capability();
        let prompt: Prompt = build_prompt(request);
        let result = self.completion.complete(&prompt).await;

        let outcome = if result.is_ok() { "success" } else { "error" };
        get_metrics()
            .generations
            .with_label_values(&[capability, outcome])
            .inc();

        result
    }
}

/// Required string field; empty counts as absent.
fn required(value: Option<String>, message: &str) -> Result<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest(message.to_string()))
}

fn parse_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected request body");
        AppError::BadRequest("Invalid JSON body".to_string())
    })
}

/// Register a new account and issue its access key.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Missing email or invalid plan", body = ErrorBody)
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<RegisterResponse>> {
    let body = parse_body(payload)?;
    let registration = state
        .registry
        .register(body.email.as_deref(), body.plan.as_deref())?;

    get_metrics()
        .registrations
        .with_label_values(&[registration.plan.as_str()])
        .inc();

    Ok(Json(RegisterResponse {
        success: true,
        api_key: registration.access_key,
        plan: registration.plan,
        limits: registration.limits,
    }))
}

/// Free-form chat.
#[utoipa::path(
    post,
    path = "/api/chat",
    tag = "generation",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Generated reply", body = ChatResponse),
        (status = 400, description = "Missing message", body = ErrorBody),
        (status = 401, description = "Missing or invalid access key", body = ErrorBody),
        (status = 429, description = "Daily quota exhausted or burst limit hit", body = ErrorBody),
        (status = 500, description = "Generation failed", body = ErrorBody)
    ),
    security(("api_key" = []))
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Extension(AuthenticatedAccount(account)): Extension<AuthenticatedAccount>,
    payload: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>> {
    let usage = state.consume_quota(&account).await?;
    let body = parse_body(payload)?;

    let request = PromptRequest::Chat {
        message: required(body.message, "Message required")?,
        context: body.context,
        system_prompt: body.system_prompt,
    };
    let response = state.generate(&request).await?;

    Ok(Json(ChatResponse {
        success: true,
        response,
        usage,
    }))
}

/// Draft an email. Unknown `type` values produce a cold email.
#[utoipa::path(
    post,
    path = "/api/email",
    tag = "generation",
    request_body = EmailRequest,
    responses(
        (status = 200, description = "Drafted email", body = EmailResponse),
        (status = 400, description = "Missing recipient or topic", body = ErrorBody),
        (status = 401, description = "Missing or invalid access key", body = ErrorBody),
        (status = 429, description = "Daily quota exhausted or burst limit hit", body = ErrorBody),
        (status = 500, description = "Generation failed", body = ErrorBody)
    ),
    security(("api_key" = []))
)]
pub async fn email(
    State(state): State<Arc<AppState>>,
    Extension(AuthenticatedAccount(account)): Extension<AuthenticatedAccount>,
    payload: std::result::Result<Json<EmailRequest>, JsonRejection>,
) -> Result<Json<EmailResponse>> {
    let usage = state.consume_quota(&account).await?;
    let body = parse_body(payload)?;

    let request = PromptRequest::Email {
        kind: EmailKind::from_type(body.kind.as_deref()),
        recipient: required(body.recipient, "Recipient required")?,
        topic: required(body.topic, "Topic required")?,
        tone: body.tone,
    };
    let email = state.generate(&request).await?;

    Ok(Json(EmailResponse {
        success: true,
        email,
        usage,
    }))
}

/// Write marketing content. Unknown `type` values produce a blog post.
#[utoipa::path(
    post,
    path = "/api/content",
    tag = "generation",
    request_body = ContentRequest,
    responses(
        (status = 200, description = "Generated content", body = ContentResponse),
        (status = 400, description = "Missing topic", body = ErrorBody),
        (status = 401, description = "Missing or invalid access key", body = ErrorBody),
        (status = 429, description = "Daily quota exhausted or burst limit hit", body = ErrorBody),
        (status = 500, description = "Generation failed", body = ErrorBody)
    ),
    security(("api_key" = []))
)]
pub async fn content(
    State(state): State<Arc<AppState>>,
    Extension(AuthenticatedAccount(account)): Extension<AuthenticatedAccount>,
    payload: std::result::Result<Json<ContentRequest>, JsonRejection>,
) -> Result<Json<ContentResponse>> {
    let usage = state.consume_quota(&account).await?;
    let body = parse_body(payload)?;

    let request = PromptRequest::Content {
        kind: ContentKind::from_type(body.kind.as_deref()),
        topic: required(body.topic, "Topic required")?,
        words: body.words,
        style: body.style,
    };
    let content = state.generate(&request).await?;

    Ok(Json(ContentResponse {
        success: true,
        content,
        usage,
    }))
}

/// Analyse free text. Unknown `type` values produce a summary.
#[utoipa::path(
    post,
    path = "/api/analyze",
    tag = "generation",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Analysis", body = AnalyzeResponse),
        (status = 400, description = "Missing data", body = ErrorBody),
        (status = 401, description = "Missing or invalid access key", body = ErrorBody),
        (status = 429, description = "Daily quota exhausted or burst limit hit", body = ErrorBody),
        (status = 500, description = "Generation failed", body = ErrorBody)
    ),
    security(("api_key" = []))
)]
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Extension(AuthenticatedAccount(account)): Extension<AuthenticatedAccount>,
    payload: std::result::Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>> {
    let usage = state.consume_quota(&account).await?;
    let body = parse_body(payload)?;

    let request = PromptRequest::Analyze {
        kind: AnalysisKind::from_type(body.kind.as_deref()),
        data: required(body.data, "Data required")?,
    };
    let analysis = state.generate(&request).await?;

    Ok(Json(AnalyzeResponse {
        success: true,
        analysis,
        usage,
    }))
}

/// Account snapshot. Does not consume quota.
#[utoipa::path(
    get,
    path = "/api/user",
    tag = "auth",
    responses(
        (status = 200, description = "Account details", body = UserInfoResponse),
        (status = 401, description = "Missing or invalid access key", body = ErrorBody)
    ),
    security(("api_key" = []))
)]
pub async fn user_info(
    State(state): State<Arc<AppState>>,
    Extension(AuthenticatedAccount(account)): Extension<AuthenticatedAccount>,
) -> Json<UserInfoResponse> {
    let usage = state.quota.usage(&account);
    Json(UserInfoResponse {
        email: account.email,
        plan: account.plan,
        requests: usage.requests,
        created_at: account.created_at,
    })
}

/// Prometheus metrics endpoint.
#[tracing::instrument]
pub async fn metrics_handler() -> Result<Response> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok((
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, encoder.format_type().to_string())],
        buffer,
    )
        .into_response())
}
