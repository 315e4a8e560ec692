//! Assistant backed by an OpenAI-compatible chat completions API.
//!
//! The API is stateless, so each session's message history is kept here
//! and replayed in full on every turn.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use super::{Assistant, AssistantContext, AssistantError, AssistantResult, SessionHandle};
use crate::config::Config;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

impl ChatMessage {
    fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ChatMessage,
}

pub struct OpenAiAssistant {
    client: Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    sessions: Mutex<HashMap<Uuid, Vec<ChatMessage>>>,
}

impl OpenAiAssistant {
    pub fn new(
        api_key: SecretString,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &Config) -> AssistantResult<Self> {
        let api_key = config
            .assistant_api_key_secret()
            .ok_or(AssistantError::NotConfigured)?;

        Ok(Self::new(
            api_key,
            &config.assistant_base_url,
            &config.assistant_model,
        ))
    }

    fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn request_body(&self, messages: &[ChatMessage]) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": messages,
        })
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

#[async_trait]
impl Assistant for OpenAiAssistant {
    async fn start_session(&self, context: &AssistantContext) -> AssistantResult<SessionHandle> {
        let system = ChatMessage::new("system", context.system_prompt()?);
        let handle = SessionHandle::new();

        self.sessions.lock().await.insert(handle.0, vec![system]);
        debug!(session = %handle.0, "assistant session started");

        Ok(handle)
    }

    async fn send_turn(&self, session: &SessionHandle, message: &str) -> AssistantResult<String> {
        let user = ChatMessage::new("user", message);

        // Build the request from a copy so the lock is not held across the call.
        let mut messages = self
            .sessions
            .lock()
            .await
            .get(&session.0)
            .cloned()
            .ok_or(AssistantError::UnknownSession(session.0))?;
        messages.push(user.clone());

        debug!(
            session = %session.0,
            turns = messages.len(),
            model = %self.model,
            "sending assistant turn"
        );

        let response: CompletionResponse = self
            .client
            .post(self.completions_url())
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(&self.request_body(&messages))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let reply = response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(AssistantError::EmptyReply)?;

        // Failed turns leave the history untouched.
        if let Some(history) = self.sessions.lock().await.get_mut(&session.0) {
            history.push(user);
            history.push(ChatMessage::new("assistant", reply.clone()));
        }

        Ok(reply)
    }

    async fn end_session(&self, session: &SessionHandle) {
        self.sessions.lock().await.remove(&session.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CurrencyCode;

    fn assistant() -> OpenAiAssistant {
        OpenAiAssistant::new(
            SecretString::from("sk-test".to_string()),
            "http://localhost:9/",
            "gpt-4o-mini",
        )
    }

    fn context() -> AssistantContext {
        AssistantContext {
            current_user: Some("Alex".to_string()),
            current_date: "Aug 30, 2024".to_string(),
            currency: CurrencyCode::Usd,
            expenses: Vec::new(),
            budgets: Vec::new(),
        }
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = Config::default();
        assert!(matches!(
            OpenAiAssistant::from_config(&config),
            Err(AssistantError::NotConfigured)
        ));

        let mut config = Config::default();
        config.set_assistant_key("sk-test".to_string());
        let assistant = OpenAiAssistant::from_config(&config).unwrap();
        assert_eq!(
            assistant.completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        assert_eq!(
            assistant().completions_url(),
            "http://localhost:9/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let assistant = assistant();
        let session = assistant.start_session(&context()).await.unwrap();
        assert_eq!(assistant.session_count().await, 1);

        {
            let sessions = assistant.sessions.lock().await;
            let history = &sessions[&session.0];
            assert_eq!(history.len(), 1);
            assert_eq!(history[0].role, "system");
            assert!(history[0].content.contains("ExpenseFlow AI"));
        }

        assistant.end_session(&session).await;
        assert_eq!(assistant.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let assistant = assistant();
        let result = assistant.send_turn(&SessionHandle::new(), "hi").await;
        assert!(matches!(result, Err(AssistantError::UnknownSession(_))));
    }

    #[test]
    fn test_request_body() {
        let messages = vec![
            ChatMessage::new("system", "be brief"),
            ChatMessage::new("user", "hi"),
        ];
        let body = assistant().request_body(&messages);
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "hi");
    }
}
