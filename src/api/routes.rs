//! Router assembly.

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::auth::{enforce_burst_limit, require_account};
use crate::api::docs::ApiDoc;
use crate::api::handlers::{
    analyze, chat, content, email, metrics_handler, register, user_info, AppState,
};
use crate::api::health::health;
use crate::core::middleware::{request_id_middleware, MetricsMiddleware};

/// Build the full application router.
///
/// Key-protected routes sit behind [`require_account`] and the generation
/// routes also behind [`enforce_burst_limit`]; registration, health,
/// metrics and docs are open.
pub fn build_router(state: Arc<AppState>) -> Router {
    let generation = Router::new()
        .route("/api/chat", post(chat))
        .route("/api/email", post(email))
        .route("/api/content", post(content))
        .route("/api/analyze", post(analyze))
        .route_layer(from_fn_with_state(state.clone(), enforce_burst_limit));

    let protected = Router::new()
        .merge(generation)
        .route("/api/user", get(user_info))
        .route_layer(from_fn_with_state(state.clone(), require_account));

    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(protected)
        .route("/api/auth/register", post(register))
        .route("/health", get(health))
        .route("/metrics", get(metrics_handler))
        .merge(swagger_ui)
        .layer(from_fn(MetricsMiddleware::track_metrics))
        .layer(from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
