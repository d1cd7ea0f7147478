//! Desktop operations - launching apps and opening URLs or files.

use super::{command_exists, OsError, OsResult};
use std::path::Path;
use tokio::process::Command;

fn validate_app_name(app: &str) -> OsResult<()> {
    if app.trim().is_empty() {
        return Err(OsError::InvalidArgument("app cannot be empty".to_string()));
    }
    if !app
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | ' '))
    {
        return Err(OsError::InvalidArgument(
            "app contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

fn validate_url(url: &str) -> OsResult<()> {
    if url.trim().is_empty() {
        return Err(OsError::InvalidArgument("url cannot be empty".to_string()));
    }
    let lower = url.to_lowercase();
    if !(lower.starts_with("http://") || lower.starts_with("https://")) {
        return Err(OsError::InvalidArgument(
            "url must start with http:// or https://".to_string(),
        ));
    }
    Ok(())
}

/// Spoken app names arrive with spaces; binaries and desktop entries use dashes.
fn normalize_command(app: &str) -> String {
    app.trim().to_lowercase().replace(' ', "-")
}

/// Launch an app by name. Tries the binary directly, then the desktop entry.
pub async fn launch_app(app: &str) -> OsResult<u32> {
    validate_app_name(app)?;
    let command = normalize_command(app);

    if command_exists(&command).await {
        let child = Command::new(&command).spawn().map_err(OsError::Io)?;
        return Ok(child.id().unwrap_or_default());
    }
    if command_exists("gtk-launch").await {
        let output = Command::new("gtk-launch").arg(&command).output().await?;
        if output.status.success() {
            return Ok(0);
        }
    }
    Err(OsError::NotFound(format!(
        "no launchable application matching '{app}'"
    )))
}

/// Open a URL in the default browser.
pub fn open_url(url: &str) -> OsResult<()> {
    validate_url(url)?;
    open::that(url).map_err(OsError::Io)
}

/// Open a file with its default application (text editor for .txt).
pub fn open_path(path: &Path) -> OsResult<()> {
    if !path.exists() {
        return Err(OsError::NotFound(path.display().to_string()));
    }
    open::that(path).map_err(OsError::Io)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_command_lowercases_and_dashes() {
        assert_eq!(normalize_command("Visual Studio Code"), "visual-studio-code");
        assert_eq!(normalize_command("firefox"), "firefox");
    }

    #[test]
    fn test_validate_app_name_rejects_shell_metacharacters() {
        assert!(validate_app_name("firefox; rm -rf /").is_err());
        assert!(validate_app_name("").is_err());
        assert!(validate_app_name("visual studio code").is_ok());
    }

    #[test]
    fn test_validate_url_requires_http_scheme() {
        assert!(validate_url("https://example.com").is_ok());
        assert!(validate_url("file:///etc/passwd").is_err());
        assert!(validate_url("").is_err());
    }
}
