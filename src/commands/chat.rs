//! Chat command - ask the assistant about the selected organization.

use anyhow::{Context, Result};
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};

use expenseflow::assistant::{Assistant, AssistantContext, ChatTranscript, OpenAiAssistant};

use super::open;

#[derive(Args)]
pub struct ChatCmd {
    /// Question to ask. Omit to chat interactively (one line per turn).
    pub message: Vec<String>,
}

impl ChatCmd {
    pub async fn run(&self, org: Option<&str>) -> Result<()> {
        let (config, store) = open(org).await?;
        let assistant = OpenAiAssistant::from_config(&config)?;

        let today = chrono::Local::now().date_naive();
        let (context, user_name) = store.with_state(|s| {
            (
                AssistantContext::from_state(s, today),
                s.current_user().map(|u| u.name.clone()),
            )
        });

        let session = assistant
            .start_session(&context)
            .await
            .context("Failed to start assistant session")?;
        let mut transcript = ChatTranscript::with_welcome(user_name.as_deref());

        if !self.message.is_empty() {
            let question = self.message.join(" ");
            if let Some(reply) = transcript.exchange(&assistant, &session, &question).await {
                println!("{}", reply.text);
            }
            assistant.end_session(&session).await;
            return Ok(());
        }

        if let Some(welcome) = transcript.last() {
            println!("{}", welcome.text);
        }

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            if let Some(reply) = transcript.exchange(&assistant, &session, &line).await {
                println!("{}", reply.text);
                println!();
            }
        }

        assistant.end_session(&session).await;
        Ok(())
    }
}
