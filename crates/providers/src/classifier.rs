//! Decision layer - classifies a query into task phrases before parsing.

use crate::traits::{ChatModel, Message, ProviderError};
use std::sync::Arc;
use tracing::debug;

const DECISION_PREAMBLE: &str = "\
You are a very accurate Decision-Making Model, which decides what kind of a query is given to you.
You will decide whether a query is a 'general' query, a 'realtime' query, or is asking to perform any task or automation.
*** Do not answer any query, just decide what kind of query is given to you. ***

-> Respond with 'general ( query )' if a query can be answered by an LLM model and doesn't require real-time data, or if the query is incomplete (e.g., 'who is he?'). Also use for time, day, date, etc.
-> Respond with 'realtime ( query )' if a query requires up-to-date information or is asking about a specific individual or entity.
-> Respond with 'open (application name or website name)' if a query is asking to open any app or website.
-> Respond with 'close (application name)' if a query is asking to close any application.
-> Respond with 'play (song name)' if a query is asking to play any song or video.
-> Respond with 'generate image (image prompt)' if a query is requesting to generate an image.
-> Respond with 'system (task name)' for muting, unmuting, or volume control.
-> Respond with 'content (topic)' if a query is asking to write any type of content (application, code, email) about a specific topic.
-> Respond with 'google search (topic)' if a query is asking to search on Google.
-> Respond with 'youtube search (topic)' if a query is asking to search on YouTube.

*** If the query is asking to perform multiple tasks like 'open facebook, telegram and close whatsapp' respond with 'open facebook, open telegram, close whatsapp'. ***
*** If the user is saying goodbye or wants to end the conversation, respond with 'exit'. ***
*** Respond with 'general (query)' if you can't decide the kind of query or if a query is asking to perform a task which is not mentioned above. ***";

const DECISION_EXAMPLES: &[(&str, &str)] = &[
    ("how are you?", "general how are you?"),
    (
        "open chrome and tell me about mahatma gandhi.",
        "open chrome, general tell me about mahatma gandhi.",
    ),
    ("open chrome and firefox", "open chrome, open firefox"),
    (
        "play some relaxing music and write an application for sick leave",
        "play relaxing music, content application for sick leave",
    ),
    ("chat with me.", "general chat with me."),
];

fn build_messages(query: &str) -> Vec<Message> {
    let mut messages = Vec::with_capacity(DECISION_EXAMPLES.len() * 2 + 2);
    messages.push(Message::system(DECISION_PREAMBLE));
    for (user, decision) in DECISION_EXAMPLES {
        messages.push(Message::user(*user));
        messages.push(Message::assistant(*decision));
    }
    messages.push(Message::user(query));
    messages
}

fn normalize(decision: &str) -> String {
    decision.replace('\n', " ").trim().to_string()
}

/// Asks the model which task phrases a query maps to and returns the raw
/// comma-joined decision string. Validation of each phrase belongs to the
/// parser; the classifier does not filter.
pub struct DecisionClassifier {
    model: Arc<dyn ChatModel>,
}

impl DecisionClassifier {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    pub async fn classify(&self, query: &str) -> Result<String, ProviderError> {
        let messages = build_messages(query);
        let mut decision = self.model.reply(&messages).await?;

        // Some models echo the preamble's placeholder instead of the query.
        if decision.contains("(query)") {
            debug!("decision echoed the placeholder, retrying once");
            decision = self.model.reply(&messages).await?;
        }

        Ok(normalize(&decision))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedModel {
        replies: Mutex<Vec<String>>,
        calls: Mutex<Vec<Vec<Message>>>,
    }

    impl ScriptedModel {
        fn new(replies: &[&str]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().rev().map(|s| s.to_string()).collect()),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn reply(&self, messages: &[Message]) -> Result<String, ProviderError> {
            self.calls.lock().unwrap().push(messages.to_vec());
            Ok(self.replies.lock().unwrap().pop().unwrap())
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    #[tokio::test]
    async fn test_classify_normalizes_newlines() {
        let model = Arc::new(ScriptedModel::new(&["open chrome,\n general hello"]));
        let classifier = DecisionClassifier::new(model);

        let decision = classifier.classify("open chrome and say hello").await.unwrap();
        assert_eq!(decision, "open chrome,  general hello");
    }

    #[tokio::test]
    async fn test_classify_retries_on_placeholder_echo() {
        let model = Arc::new(ScriptedModel::new(&["general (query)", "general how are you"]));
        let classifier = DecisionClassifier::new(Arc::clone(&model) as Arc<dyn ChatModel>);

        let decision = classifier.classify("how are you").await.unwrap();
        assert_eq!(decision, "general how are you");
        assert_eq!(model.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_query_is_last_message_after_examples() {
        let model = Arc::new(ScriptedModel::new(&["exit"]));
        let classifier = DecisionClassifier::new(Arc::clone(&model) as Arc<dyn ChatModel>);

        classifier.classify("bye").await.unwrap();

        let calls = model.calls.lock().unwrap();
        let messages = &calls[0];
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages.last().unwrap().role, "user");
        assert_eq!(messages.last().unwrap().content, "bye");
        assert_eq!(messages.len(), DECISION_EXAMPLES.len() * 2 + 2);
    }
}
