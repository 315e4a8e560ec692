//! Display-only record of a chat with the assistant.

use tracing::warn;

use super::{Assistant, AssistantError, SessionHandle};

const EMPTY_REPLY_TEXT: &str = "I'm having trouble processing that right now.";
const ERROR_TEXT: &str = "Sorry, I encountered an error connecting to the AI service.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
    /// Set on the stand-in reply shown when a turn failed.
    pub is_error: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ChatTranscript {
    entries: Vec<TranscriptEntry>,
}

impl ChatTranscript {
    /// A transcript opened with the assistant's greeting.
    pub fn with_welcome(user_name: Option<&str>) -> Self {
        let name = user_name.filter(|n| !n.trim().is_empty()).unwrap_or("there");
        let mut transcript = Self::default();
        transcript.push(
            Speaker::Assistant,
            format!(
                "Hi {}! I'm your ExpenseFlow assistant. Ask me about your spending, budgets, \
                 or recent transactions.",
                name
            ),
            false,
        );
        transcript
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    fn push(&mut self, speaker: Speaker, text: String, is_error: bool) {
        self.entries.push(TranscriptEntry {
            speaker,
            text,
            is_error,
        });
    }

    /// Send `message` and record both sides of the exchange.
    ///
    /// Blank messages are ignored and return `None`. A failed turn is
    /// recorded as an error entry rather than returned.
    pub async fn exchange(
        &mut self,
        assistant: &dyn Assistant,
        session: &SessionHandle,
        message: &str,
    ) -> Option<&TranscriptEntry> {
        if message.trim().is_empty() {
            return None;
        }

        self.push(Speaker::User, message.to_string(), false);

        match assistant.send_turn(session, message).await {
            Ok(reply) if !reply.trim().is_empty() => self.push(Speaker::Assistant, reply, false),
            Ok(_) | Err(AssistantError::EmptyReply) => {
                self.push(Speaker::Assistant, EMPTY_REPLY_TEXT.to_string(), false)
            }
            Err(e) => {
                warn!(error = %e, "assistant turn failed");
                self.push(Speaker::Assistant, ERROR_TEXT.to_string(), true);
            }
        }

        self.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::MockAssistant;

    #[test]
    fn test_welcome() {
        let transcript = ChatTranscript::with_welcome(Some("Alex"));
        assert_eq!(transcript.entries().len(), 1);
        assert!(transcript.entries()[0].text.starts_with("Hi Alex! I'm your ExpenseFlow"));

        let anonymous = ChatTranscript::with_welcome(None);
        assert!(anonymous.entries()[0].text.starts_with("Hi there!"));
    }

    #[tokio::test]
    async fn test_exchange_records_both_sides() {
        let mut assistant = MockAssistant::new();
        assistant
            .expect_send_turn()
            .withf(|_, message| message == "How much on software?")
            .times(1)
            .returning(|_, _| Ok("$144.00 so far.".to_string()));

        let session = SessionHandle::new();
        let mut transcript = ChatTranscript::with_welcome(Some("Alex"));
        let reply = transcript
            .exchange(&assistant, &session, "How much on software?")
            .await
            .cloned();

        assert_eq!(reply.unwrap().text, "$144.00 so far.");
        let speakers: Vec<_> = transcript.entries().iter().map(|e| e.speaker).collect();
        assert_eq!(
            speakers,
            vec![Speaker::Assistant, Speaker::User, Speaker::Assistant]
        );
    }

    #[tokio::test]
    async fn test_blank_message_is_ignored() {
        let mut assistant = MockAssistant::new();
        assistant.expect_send_turn().never();

        let mut transcript = ChatTranscript::default();
        assert!(
            transcript
                .exchange(&assistant, &SessionHandle::new(), "   ")
                .await
                .is_none()
        );
        assert!(transcript.entries().is_empty());
    }

    #[tokio::test]
    async fn test_failure_becomes_error_entry() {
        let mut assistant = MockAssistant::new();
        assistant
            .expect_send_turn()
            .returning(|session, _| Err(AssistantError::UnknownSession(session.0)));

        let mut transcript = ChatTranscript::default();
        transcript
            .exchange(&assistant, &SessionHandle::new(), "hello")
            .await;

        let last = transcript.last().unwrap();
        assert!(last.is_error);
        assert_eq!(last.text, ERROR_TEXT);
    }

    #[tokio::test]
    async fn test_empty_reply_uses_fallback() {
        let mut assistant = MockAssistant::new();
        assistant
            .expect_send_turn()
            .returning(|_, _| Ok(String::new()));

        let mut transcript = ChatTranscript::default();
        transcript
            .exchange(&assistant, &SessionHandle::new(), "hello")
            .await;

        let last = transcript.last().unwrap();
        assert!(!last.is_error);
        assert_eq!(last.text, EMPTY_REPLY_TEXT);
    }
}
