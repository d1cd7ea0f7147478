use crate::command::CommandKind;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("no handler registered for {0}")]
    NotFound(CommandKind),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("execution error: {0}")]
    Execution(String),
}

/// One side-effecting operation implementing a single command kind.
///
/// Handlers normalize whatever their underlying collaborator reports
/// (booleans, exceptions, nothing) into a `Result`, so the executor only
/// ever sees success or a reason.
#[async_trait]
pub trait Handler: Send + Sync {
    fn kind(&self) -> CommandKind;
    fn description(&self) -> &str;

    async fn run(&self, argument: &str) -> Result<(), HandlerError>;
}

/// Kind-keyed set of registered handlers.
pub struct HandlerRegistry {
    handlers: HashMap<CommandKind, Arc<dyn Handler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register(&mut self, handler: Arc<dyn Handler>) {
        self.handlers.insert(handler.kind(), handler);
    }

    pub fn get(&self, kind: CommandKind) -> Option<Arc<dyn Handler>> {
        self.handlers.get(&kind).cloned()
    }

    pub fn kinds(&self) -> Vec<CommandKind> {
        self.handlers.keys().copied().collect()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
