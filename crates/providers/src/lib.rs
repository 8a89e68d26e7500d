//! Upstream chat-completion backends.
//!
//! The dispatcher only sees the [`CompletionBackend`] trait and the
//! per-attempt [`Outcome`]; the one real implementation speaks the
//! OpenAI-compatible wire format used by Groq and similar providers.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatClient;

use async_trait::async_trait;

/// Role-tagged message in a chat-completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatMessage {
    System { content: String },
    User { content: String },
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            content: content.into(),
        }
    }

    /// OpenAI-compatible JSON form.
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        match self {
            ChatMessage::System { content } => {
                serde_json::json!({ "role": "system", "content": content })
            },
            ChatMessage::User { content } => {
                serde_json::json!({ "role": "user", "content": content })
            },
        }
    }
}

/// Parsed chat completion from the upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Model id the upstream reports having served the request.
    pub model: String,
    /// First choice's message content.
    pub content: String,
}

/// Result of a single upstream attempt.
///
/// Rate limiting is not an error from the adapter's point of view: the
/// dispatcher turns it into a cooldown and moves on to the next candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(Completion),
    RateLimited { retry_after_secs: u64 },
    /// Any non-quota failure. `status` is 0 when the request failed before
    /// an HTTP status was received (timeout, refused connection).
    HardFailure { status: u16, detail: String },
}

/// A backend serving one chat-completion attempt per call.
///
/// Implementations make exactly one upstream call; fallback and retry
/// policy belong to the dispatcher.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, model: &str, messages: &[ChatMessage]) -> Outcome;
}
