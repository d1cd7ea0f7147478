//! System command handler - audio control by spoken phrase.

use crate::os;
use async_trait::async_trait;
use tracing::info;
use valet_core::{CommandKind, Handler, HandlerError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AudioAction {
    Mute,
    Unmute,
    VolumeUp,
    VolumeDown,
}

fn parse_action(argument: &str) -> Option<AudioAction> {
    let normalized = argument
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    match normalized.as_str() {
        "mute" => Some(AudioAction::Mute),
        "unmute" => Some(AudioAction::Unmute),
        "volume up" => Some(AudioAction::VolumeUp),
        "volume down" => Some(AudioAction::VolumeDown),
        _ => None,
    }
}

/// Executes the small fixed set of system phrases. Unmute restores audio
/// for real instead of toggling mute a second time.
pub struct SystemCommandHandler;

#[async_trait]
impl Handler for SystemCommandHandler {
    fn kind(&self) -> CommandKind {
        CommandKind::RunSystemCommand
    }

    fn description(&self) -> &str {
        "mute, unmute, or step the system volume"
    }

    async fn run(&self, argument: &str) -> Result<(), HandlerError> {
        let Some(action) = parse_action(argument) else {
            return Err(HandlerError::Validation(format!(
                "unknown system command '{argument}'"
            )));
        };

        let result = match action {
            AudioAction::Mute => os::audio::mute().await,
            AudioAction::Unmute => os::audio::unmute().await,
            AudioAction::VolumeUp => os::audio::volume_up().await,
            AudioAction::VolumeDown => os::audio::volume_down().await,
        };
        result.map_err(|e| HandlerError::Execution(e.to_string()))?;
        info!(action = ?action, "system command applied");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_action_accepts_known_phrases() {
        assert_eq!(parse_action("mute"), Some(AudioAction::Mute));
        assert_eq!(parse_action("UNMUTE"), Some(AudioAction::Unmute));
        assert_eq!(parse_action("volume up"), Some(AudioAction::VolumeUp));
        assert_eq!(parse_action("  volume   down "), Some(AudioAction::VolumeDown));
    }

    #[test]
    fn test_parse_action_rejects_unknown_phrases() {
        assert_eq!(parse_action("volume to 50"), None);
        assert_eq!(parse_action("brightness up"), None);
        assert_eq!(parse_action(""), None);
    }

    #[tokio::test]
    async fn test_unknown_command_is_a_validation_error() {
        let handler = SystemCommandHandler;
        let err = handler.run("do a barrel roll").await.unwrap_err();
        assert!(matches!(err, HandlerError::Validation(_)));
    }
}
