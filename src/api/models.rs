//! API request and response models.
//!
//! Request fields are all optional at the serde level; required fields are
//! checked by the handlers so a missing field yields a 400 with the
//! gateway's own error body instead of an extractor rejection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::services::{Limits, Plan, Usage};

/// Registration request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({"email": "a@b.com", "plan": "free"}))]
pub struct RegisterRequest {
    /// Contact address; required, not format-validated
    pub email: Option<String>,

    /// "free" (default) or "pro"
    pub plan: Option<String>,
}

/// Registration response. `apiKey` is shown only once.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "success": true,
    "apiKey": "ak_3f9c2a1b7e6d5c4b3a2918f7e6d5c4b3",
    "plan": "free",
    "limits": {"monthly": 50}
}))]
pub struct RegisterResponse {
    pub success: bool,
    pub api_key: String,
    pub plan: Plan,
    pub limits: Limits,
}

/// Chat request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({"message": "How do I price a SaaS product?", "context": "B2B startup"}))]
pub struct ChatRequest {
    /// User message; required
    pub message: Option<String>,

    /// Optional system prompt passed through to the model
    pub system_prompt: Option<String>,

    /// Optional context prepended to the message
    pub context: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
    pub usage: Usage,
}

/// Email drafting request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({"type": "cold", "recipient": "the CTO of Acme", "topic": "our CI product"}))]
pub struct EmailRequest {
    /// "cold", "followup" or "response"; anything else is treated as "cold"
    #[serde(rename = "type", default, deserialize_with = "lenient_type")]
    pub kind: Option<String>,

    /// Required
    pub recipient: Option<String>,

    /// Required
    pub topic: Option<String>,

    /// Defaults to "professional"
    pub tone: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EmailResponse {
    pub success: bool,
    pub email: String,
    pub usage: Usage,
}

/// Content writing request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({"type": "blog", "topic": "remote work", "words": 800}))]
pub struct ContentRequest {
    /// "blog", "social" or "product"; anything else is treated as "blog"
    #[serde(rename = "type", default, deserialize_with = "lenient_type")]
    pub kind: Option<String>,

    /// Required
    pub topic: Option<String>,

    /// Target length; defaults to 500. Numeric strings are accepted.
    #[serde(default, deserialize_with = "lenient_words")]
    pub words: Option<u32>,

    /// Defaults to "informative"
    pub style: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ContentResponse {
    pub success: bool,
    pub content: String,
    pub usage: Usage,
}

/// Analysis request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({"type": "swot", "data": "A local bakery expanding online"}))]
pub struct AnalyzeRequest {
    /// "swot", "summary" or "sentiment"; anything else is treated as "summary"
    #[serde(rename = "type", default, deserialize_with = "lenient_type")]
    pub kind: Option<String>,

    /// Required
    pub data: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub analysis: String,
    pub usage: Usage,
}

/// Template selector: any non-string value reads as absent so the
/// category default applies.
fn lenient_type<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(kind)) => Some(kind),
        _ => None,
    })
}

/// Word count: a non-negative integer or a string holding one. Anything
/// else reads as absent.
fn lenient_words<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(raw)) => raw.trim().parse().ok(),
        _ => None,
    })
}

/// Account snapshot.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserInfoResponse {
    pub email: String,
    pub plan: Plan,
    /// Requests used today
    pub requests: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({"status": "ok", "timestamp": "2026-01-01T00:00:00.000Z"}))]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}
