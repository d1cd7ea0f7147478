//! Audio control - mute state and volume steps.
//!
//! Every operation probes backends in order: wpctl (PipeWire), pactl
//! (PulseAudio), amixer (ALSA). Mute and unmute set an explicit state
//! rather than toggling, so repeated calls are idempotent.

use super::{command_exists, run_checked, OsError, OsResult};

/// Mute the default output sink.
pub async fn mute() -> OsResult<()> {
    set_mute(true).await
}

/// Unmute the default output sink.
pub async fn unmute() -> OsResult<()> {
    set_mute(false).await
}

async fn set_mute(muted: bool) -> OsResult<()> {
    if command_exists("wpctl").await {
        let flag = if muted { "1" } else { "0" };
        return run_checked("wpctl", &["set-mute", "@DEFAULT_AUDIO_SINK@", flag]).await;
    }
    if command_exists("pactl").await {
        let flag = if muted { "1" } else { "0" };
        return run_checked("pactl", &["set-sink-mute", "@DEFAULT_SINK@", flag]).await;
    }
    if command_exists("amixer").await {
        let flag = if muted { "mute" } else { "unmute" };
        return run_checked("amixer", &["-q", "set", "Master", flag]).await;
    }
    Err(OsError::OperationFailed(
        "No audio backend found (install 'wpctl', 'pactl', or 'amixer')".to_string(),
    ))
}

/// Raise the default sink volume by one step.
pub async fn volume_up() -> OsResult<()> {
    step_volume(true).await
}

/// Lower the default sink volume by one step.
pub async fn volume_down() -> OsResult<()> {
    step_volume(false).await
}

async fn step_volume(up: bool) -> OsResult<()> {
    if command_exists("wpctl").await {
        let step = if up { "5%+" } else { "5%-" };
        return run_checked("wpctl", &["set-volume", "@DEFAULT_AUDIO_SINK@", step]).await;
    }
    if command_exists("pactl").await {
        let step = if up { "+5%" } else { "-5%" };
        return run_checked("pactl", &["set-sink-volume", "@DEFAULT_SINK@", step]).await;
    }
    if command_exists("amixer").await {
        let step = if up { "5%+" } else { "5%-" };
        return run_checked("amixer", &["-q", "set", "Master", step]).await;
    }
    Err(OsError::OperationFailed(
        "No audio backend found (install 'wpctl', 'pactl', or 'amixer')".to_string(),
    ))
}
