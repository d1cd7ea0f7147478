//! General chat - persona plus wall-clock preamble over the session log.

use crate::traits::{ChatModel, Message, ProviderError};
use std::sync::Arc;
use valet_memory::ChatLog;

/// How the model sees the current date and time. Injected every turn so
/// clock and calendar questions work without a tool call.
pub(crate) fn clock_preamble() -> String {
    let now = chrono::Local::now();
    format!(
        "Please use this real-time information if needed,\nDay : {}, Date : {}, Time : {}\n",
        now.format("%A"),
        now.format("%d %B %Y"),
        now.format("%I:%M:%S"),
    )
}

/// Strip end-of-sequence leftovers and blank lines from a model answer.
pub(crate) fn tidy_answer(answer: &str) -> String {
    answer
        .replace("</s>", "")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Conversational replies with no live data beyond the clock.
pub struct AssistantChat {
    model: Arc<dyn ChatModel>,
    assistant_name: String,
    user_name: String,
    history_limit: usize,
}

impl AssistantChat {
    pub fn new(
        model: Arc<dyn ChatModel>,
        assistant_name: impl Into<String>,
        user_name: impl Into<String>,
        history_limit: usize,
    ) -> Self {
        Self {
            model,
            assistant_name: assistant_name.into(),
            user_name: user_name.into(),
            history_limit,
        }
    }

    fn persona_preamble(&self) -> String {
        format!(
            "Hello, I am {}, You are a very accurate and advanced AI assistant named {} \
             which also has real-time up-to-date information from the internet.\n\
             *** Do not tell time until I ask, do not talk too much, just answer the question. ***\n\
             *** Do not provide notes in the output, just answer the question and never mention \
             your training data. ***",
            self.user_name, self.assistant_name
        )
    }

    /// Answer a query against the session log. The log itself is not
    /// mutated; the caller records the turn.
    pub async fn reply(&self, log: &ChatLog, query: &str) -> Result<String, ProviderError> {
        let mut messages = vec![
            Message::system(self.persona_preamble()),
            Message::system(clock_preamble()),
        ];
        for entry in log.recent(self.history_limit) {
            messages.push(Message {
                role: entry.role.clone(),
                content: entry.content.clone(),
            });
        }
        messages.push(Message::user(query));

        let answer = self.model.reply(&messages).await?;
        Ok(tidy_answer(&answer))
    }
}
