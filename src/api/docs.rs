//! OpenAPI documentation for the public API.

use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "AI Agent Gateway",
        description = "Access-key authenticated text generation with a daily quota. \
                       Unknown `type` values on /api/email, /api/content and /api/analyze \
                       never fail; they select that endpoint's default template."
    ),
    paths(
        crate::api::handlers::register,
        crate::api::handlers::chat,
        crate::api::handlers::email,
        crate::api::handlers::content,
        crate::api::handlers::analyze,
        crate::api::handlers::user_info,
        crate::api::health::health,
    ),
    components(
        schemas(
            crate::api::models::RegisterRequest,
            crate::api::models::RegisterResponse,
            crate::api::models::ChatRequest,
            crate::api::models::ChatResponse,
            crate::api::models::EmailRequest,
            crate::api::models::EmailResponse,
            crate::api::models::ContentRequest,
            crate::api::models::ContentResponse,
            crate::api::models::AnalyzeRequest,
            crate::api::models::AnalyzeResponse,
            crate::api::models::UserInfoResponse,
            crate::api::models::HealthResponse,
            crate::core::error::ErrorBody,
            crate::services::Usage,
            crate::services::Plan,
            crate::services::Limits,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration and account info"),
        (name = "generation", description = "Quota-counted text generation"),
        (name = "system", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Registers the `x-api-key` header scheme referenced by protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("x-api-key"))),
            );
        }
    }
}
