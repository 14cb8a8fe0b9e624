//! Business logic for the gateway.
//!
//! - [`store`]: account records and the storage abstraction
//! - [`key_registry`]: access key issuance and resolution
//! - [`quota`]: per-account daily quota
//! - [`prompt`]: per-capability prompt templates
//! - [`completion`]: client for the remote completion provider

pub mod completion;
pub mod key_registry;
pub mod prompt;
pub mod quota;
pub mod store;

pub use completion::{CompletionClient, CompletionRequest, Turn};
pub use key_registry::{hash_key, KeyGenerator, KeyRegistry, Registration, SecureKeyGenerator};
pub use prompt::{build_prompt, AnalysisKind, ContentKind, EmailKind, Prompt, PromptRequest};
pub use quota::{QuotaDecision, QuotaTracker, Remaining, Usage};
pub use store::{Account, AccountStore, InMemoryAccountStore, Limits, Plan};
