//! Prompt templates for each capability.
//!
//! Each category has a closed set of template kinds. Unrecognised or absent
//! `type` values select the category's default kind instead of failing, so
//! a caller with a typo still gets a result.

pub const EMAIL_SYSTEM_PROMPT: &str = "You are a professional email writer.";
pub const CONTENT_SYSTEM_PROMPT: &str = "You are a professional content writer.";
pub const ANALYSIS_SYSTEM_PROMPT: &str = "You are a business analyst.";

pub const DEFAULT_TONE: &str = "professional";
pub const DEFAULT_WORDS: u32 = 500;
pub const DEFAULT_STYLE: &str = "informative";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmailKind {
    #[default]
    Cold,
    FollowUp,
    Response,
}

impl EmailKind {
    /// Anything other than `followup` or `response` is a cold email.
    pub fn from_type(raw: Option<&str>) -> Self {
        match raw {
            Some("followup") => EmailKind::FollowUp,
            Some("response") => EmailKind::Response,
            _ => EmailKind::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentKind {
    #[default]
    Blog,
    Social,
    Product,
}

impl ContentKind {
    /// Anything other than `social` or `product` is a blog post.
    pub fn from_type(raw: Option<&str>) -> Self {
        match raw {
            Some("social") => ContentKind::Social,
            Some("product") => ContentKind::Product,
            _ => ContentKind::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisKind {
    Swot,
    #[default]
    Summary,
    Sentiment,
}

impl AnalysisKind {
    /// Anything other than `swot` or `sentiment` is a summary.
    pub fn from_type(raw: Option<&str>) -> Self {
        match raw {
            Some("swot") => AnalysisKind::Swot,
            Some("sentiment") => AnalysisKind::Sentiment,
            _ => AnalysisKind::default(),
        }
    }
}

/// Validated inputs for one capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptRequest {
    Chat {
        message: String,
        context: Option<String>,
        system_prompt: Option<String>,
    },
    Email {
        kind: EmailKind,
        recipient: String,
        topic: String,
        tone: Option<String>,
    },
    Content {
        kind: ContentKind,
        topic: String,
        words: Option<u32>,
        style: Option<String>,
    },
    Analyze {
        kind: AnalysisKind,
        data: String,
    },
}

impl PromptRequest {
    /// Label used in logs and metrics.
    pub fn capability(&self) -> &'static str {
        match self {
            PromptRequest::Chat { .. } => "chat",
            PromptRequest::Email { .. } => "email",
            PromptRequest::Content { .. } => "content",
            PromptRequest::Analyze { .. } => "analyze",
        }
    }
}

/// A system/user prompt pair ready for the completion client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system_prompt: Option<String>,
    pub user_prompt: String,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

pub fn build_prompt(request: &PromptRequest) -> Prompt {
    match request {
        PromptRequest::Chat {
            message,
            context,
            system_prompt,
        } => {
            let user_prompt = match non_empty(context) {
                Some(context) => format!("Context: {}\n\nUser: {}", context, message),
                None => message.clone(),
            };
            Prompt {
                system_prompt: non_empty(system_prompt).map(str::to_string),
                user_prompt,
            }
        }
        PromptRequest::Email {
            kind,
            recipient,
            topic,
            tone,
        } => {
            let tone = non_empty(tone).unwrap_or(DEFAULT_TONE);
            let user_prompt = match kind {
                EmailKind::Cold => format!(
                    "Write a cold email to {} about {}. Tone: {}. Include subject line.",
                    recipient, topic, tone
                ),
                EmailKind::FollowUp => format!(
                    "Write a follow-up email about {} to {}. Tone: {}.",
                    topic, recipient, tone
                ),
                EmailKind::Response => format!(
                    "Write a response email to {} about {}. Tone: {}.",
                    recipient, topic, tone
                ),
            };
            Prompt {
                system_prompt: Some(EMAIL_SYSTEM_PROMPT.to_string()),
                user_prompt,
            }
        }
        PromptRequest::Content {
            kind,
            topic,
            words,
            style,
        } => {
            let words = words.unwrap_or(DEFAULT_WORDS);
            let style = non_empty(style).unwrap_or(DEFAULT_STYLE);
            let user_prompt = match kind {
                ContentKind::Blog => format!(
                    "Write a {}-word blog post about {}. Style: {}.",
                    words, topic, style
                ),
                ContentKind::Social => format!(
                    "Write a social media post about {}. Engaging and concise.",
                    topic
                ),
                ContentKind::Product => format!(
                    "Write a product description for {}. {} words. Persuasive style.",
                    topic, words
                ),
            };
            Prompt {
                system_prompt: Some(CONTENT_SYSTEM_PROMPT.to_string()),
                user_prompt,
            }
        }
        PromptRequest::Analyze { kind, data } => {
            let user_prompt = match kind {
                AnalysisKind::Swot => format!("Perform SWOT analysis for: {}", data),
                AnalysisKind::Summary => format!("Summarize this: {}", data),
                AnalysisKind::Sentiment => format!("Analyze sentiment of: {}", data),
            };
            Prompt {
                system_prompt: Some(ANALYSIS_SYSTEM_PROMPT.to_string()),
                user_prompt,
            }
        }
    }
}
