use serde::{Deserialize, Serialize};

/// One message in a chat session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatEntry {
    pub timestamp: i64,
    pub role: String,
    pub content: String,
}

impl ChatEntry {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            timestamp: chrono::Utc::now().timestamp(),
            role: role.into(),
            content: content.into(),
        }
    }
}

/// A caller-owned chat session: loaded at startup, appended to per turn,
/// saved explicitly through the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatLog {
    pub session_id: String,
    #[serde(default)]
    pub entries: Vec<ChatEntry>,
}

impl ChatLog {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            entries: Vec::new(),
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.entries.push(ChatEntry::new("user", content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.entries.push(ChatEntry::new("assistant", content));
    }

    /// Tail view of at most `limit` entries, for prompt building.
    pub fn recent(&self, limit: usize) -> &[ChatEntry] {
        let start = self.entries.len().saturating_sub(limit);
        &self.entries[start..]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
