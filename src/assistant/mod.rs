//! Conversational assistant over the active organization's data.
//!
//! The assistant only ever sees an [`AssistantContext`] snapshot taken when
//! the session starts; it has no access to the store.

mod context;
mod openai;
mod transcript;

pub use context::{AssistantContext, BudgetContext, ExpenseContext};
pub use openai::OpenAiAssistant;
pub use transcript::{ChatTranscript, Speaker, TranscriptEntry};

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("assistant API key not configured. Run: ef config assistant --key <KEY>")]
    NotConfigured,

    #[error("unknown assistant session: {0}")]
    UnknownSession(Uuid),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("assistant returned an empty reply")]
    EmptyReply,
}

pub type AssistantResult<T> = Result<T, AssistantError>;

/// Opaque handle to a conversation held by an [`Assistant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionHandle(pub Uuid);

impl SessionHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Assistant: Send + Sync {
    /// Open a conversation primed with `context`.
    async fn start_session(&self, context: &AssistantContext) -> AssistantResult<SessionHandle>;

    /// Send one user turn and return the reply text.
    async fn send_turn(&self, session: &SessionHandle, message: &str) -> AssistantResult<String>;

    async fn end_session(&self, session: &SessionHandle);
}
