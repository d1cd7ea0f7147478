use serde::{Deserialize, Serialize};

/// The closed set of intents the classifier can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    OpenApp,
    CloseApp,
    PlayMedia,
    GenerateImage,
    RunSystemCommand,
    WriteContent,
    WebSearch,
    VideoSearch,
    GeneralChat,
    RealtimeChat,
    Exit,
}

impl CommandKind {
    /// Kinds the caller executes through its own collaborators (chat model,
    /// search-augmented model, image pipeline) instead of the automation
    /// executor.
    pub fn is_delegated(&self) -> bool {
        matches!(
            self,
            CommandKind::GeneralChat
                | CommandKind::RealtimeChat
                | CommandKind::GenerateImage
                | CommandKind::Exit
        )
    }

    /// Every kind except `Exit` needs a non-empty argument to be actionable.
    pub fn requires_argument(&self) -> bool {
        !matches!(self, CommandKind::Exit)
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CommandKind::OpenApp => "open_app",
            CommandKind::CloseApp => "close_app",
            CommandKind::PlayMedia => "play_media",
            CommandKind::GenerateImage => "generate_image",
            CommandKind::RunSystemCommand => "run_system_command",
            CommandKind::WriteContent => "write_content",
            CommandKind::WebSearch => "web_search",
            CommandKind::VideoSearch => "video_search",
            CommandKind::GeneralChat => "general_chat",
            CommandKind::RealtimeChat => "realtime_chat",
            CommandKind::Exit => "exit",
        };
        f.write_str(name)
    }
}

/// One classified task: a kind plus its free-text argument.
///
/// Commands are built fresh per classifier call, stay immutable, and are
/// discarded after dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub kind: CommandKind,
    pub argument: String,
}

impl Command {
    pub fn new(kind: CommandKind, argument: impl Into<String>) -> Self {
        Self {
            kind,
            argument: argument.into(),
        }
    }
}

/// Per-command result reported by the executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskOutcome {
    Success,
    Failure(String),
    /// The command was accepted but never attempted (e.g. an empty argument
    /// slipped past the parser). Not an error.
    Skipped,
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Success)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, TaskOutcome::Failure(_))
    }
}

/// Commands accepted for execution paired with their outcomes.
///
/// Invariant: `outcomes[i]` belongs to `commands[i]`. Outcome order reflects
/// input order, never completion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionBatch {
    pub commands: Vec<Command>,
    pub outcomes: Vec<TaskOutcome>,
}

impl ExecutionBatch {
    pub fn empty() -> Self {
        Self {
            commands: Vec::new(),
            outcomes: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Commands with their outcomes, in input order.
    pub fn iter(&self) -> impl Iterator<Item = (&Command, &TaskOutcome)> {
        self.commands.iter().zip(self.outcomes.iter())
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }
}
