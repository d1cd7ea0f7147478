//! Content writing handler - generate text for a topic and open it.

use crate::os;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use valet_core::{CommandKind, Handler, HandlerError};

/// Produces the text body for a topic. The app adapts its chat model into
/// this with a content-writer prompt.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, topic: &str) -> Result<String, HandlerError>;
}

/// Turn a spoken topic into a safe file name.
fn topic_filename(topic: &str) -> String {
    let stem: String = topic
        .trim()
        .to_lowercase()
        .chars()
        .map(|ch| {
            if ch.is_alphanumeric() || ch == '-' {
                ch
            } else {
                '_'
            }
        })
        .collect();
    format!("{stem}.txt")
}

/// Generates content for a topic, writes it under the data directory,
/// and opens the file in the default editor.
pub struct WriteContentHandler {
    generator: Arc<dyn ContentGenerator>,
    data_dir: PathBuf,
    open_after_write: bool,
}

impl WriteContentHandler {
    pub fn new(generator: Arc<dyn ContentGenerator>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            generator,
            data_dir: data_dir.into(),
            open_after_write: true,
        }
    }

    /// Leave the file on disk without opening an editor. Used by tests and
    /// headless sessions.
    pub fn without_editor(mut self) -> Self {
        self.open_after_write = false;
        self
    }
}

#[async_trait]
impl Handler for WriteContentHandler {
    fn kind(&self) -> CommandKind {
        CommandKind::WriteContent
    }

    fn description(&self) -> &str {
        "write generated content for a topic to a file and open it"
    }

    async fn run(&self, argument: &str) -> Result<(), HandlerError> {
        let text = self.generator.generate(argument).await?;

        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|e| HandlerError::Execution(format!("could not create data dir: {e}")))?;

        let path = self.data_dir.join(topic_filename(argument));
        let tmp_path = path.with_extension("txt.tmp");
        tokio::fs::write(&tmp_path, &text)
            .await
            .map_err(|e| HandlerError::Execution(format!("could not write content: {e}")))?;
        tokio::fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| HandlerError::Execution(format!("could not finalize content: {e}")))?;

        info!(topic = argument, path = %path.display(), "content written");

        if self.open_after_write {
            if let Err(e) = os::desktop::open_path(&path) {
                warn!(error = %e, "could not open generated content in an editor");
            }
        }
        Ok(())
    }
}
