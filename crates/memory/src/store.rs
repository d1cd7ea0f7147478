use crate::types::ChatLog;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// File-backed chat log persistence, one JSON file per session.
pub struct ChatLogStore {
    base_path: PathBuf,
}

impl ChatLogStore {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    pub async fn initialize(&self) -> Result<(), MemoryError> {
        fs::create_dir_all(&self.base_path).await?;
        tracing::info!("Chat log store initialized at {:?}", self.base_path);
        Ok(())
    }

    /// Load a session's log, or start a fresh one when no file exists.
    pub async fn load(&self, session_id: &str) -> Result<ChatLog, MemoryError> {
        let path = self.log_path(session_id);

        if !path.exists() {
            tracing::info!("Starting new chat log for session: {}", session_id);
            return Ok(ChatLog::new(session_id));
        }

        let content = fs::read_to_string(&path).await?;
        let log: ChatLog = serde_json::from_str(&content)?;

        tracing::info!(
            "Loaded chat log for session: {} ({} entries)",
            session_id,
            log.entries.len()
        );
        Ok(log)
    }

    pub async fn save(&self, log: &ChatLog) -> Result<(), MemoryError> {
        let path = self.log_path(&log.session_id);

        // Atomic write: write to temp file, then rename
        let temp_path = path.with_extension("tmp");
        let content = serde_json::to_string_pretty(log)?;

        fs::write(&temp_path, content).await?;
        fs::rename(&temp_path, &path).await?;

        tracing::debug!("Saved chat log for session: {}", log.session_id);
        Ok(())
    }

    pub async fn delete(&self, session_id: &str) -> Result<(), MemoryError> {
        let path = self.log_path(session_id);
        if path.exists() {
            fs::remove_file(&path).await?;
            tracing::info!("Deleted chat log for session: {}", session_id);
        }
        Ok(())
    }

    fn log_path(&self, session_id: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", session_id))
    }
}
