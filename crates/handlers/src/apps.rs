//! Application lifecycle handlers - open and close by spoken name.

use crate::{os, web};
use async_trait::async_trait;
use tracing::{info, warn};
use valet_core::{CommandKind, Handler, HandlerError};

/// Browsers are never closed by name. A spoken "close chrome" usually
/// follows a misheard query and would take the whole session down.
const BROWSER_DENY_LIST: &[&str] = &["chrome", "chromium", "firefox", "safari", "brave", "edge"];

fn is_protected_browser(app: &str) -> bool {
    let lowered = app.trim().to_lowercase();
    BROWSER_DENY_LIST
        .iter()
        .any(|browser| lowered.contains(browser))
}

/// Launches an application, falling back to its website when no local
/// binary or desktop entry matches.
pub struct OpenAppHandler {
    client: reqwest::Client,
}

impl OpenAppHandler {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Handler for OpenAppHandler {
    fn kind(&self) -> CommandKind {
        CommandKind::OpenApp
    }

    fn description(&self) -> &str {
        "launch a named application, or open its website if not installed"
    }

    async fn run(&self, argument: &str) -> Result<(), HandlerError> {
        match os::desktop::launch_app(argument).await {
            Ok(pid) => {
                info!(app = argument, pid, "launched application");
                return Ok(());
            }
            Err(e) => {
                warn!(app = argument, error = %e, "native launch failed, trying the web");
            }
        }

        let url = web::search_url(&format!("Open {argument} website"));
        let html = web::fetch_page(&self.client, &url)
            .await
            .map_err(|e| HandlerError::Execution(format!("website lookup failed: {e}")))?;

        let links = web::extract_links(&html);
        let Some(first) = links.first() else {
            return Err(HandlerError::Execution(format!(
                "no launchable app or website found for '{argument}'"
            )));
        };
        info!(app = argument, url = %first, "opening website instead");
        os::desktop::open_url(first).map_err(|e| HandlerError::Execution(e.to_string()))
    }
}

/// Terminates every process matching the given name.
pub struct CloseAppHandler;

#[async_trait]
impl Handler for CloseAppHandler {
    fn kind(&self) -> CommandKind {
        CommandKind::CloseApp
    }

    fn description(&self) -> &str {
        "terminate a named application by process name"
    }

    async fn run(&self, argument: &str) -> Result<(), HandlerError> {
        if is_protected_browser(argument) {
            info!(app = argument, "refusing to close a browser");
            return Ok(());
        }

        let killed = os::process::kill_by_name(argument)
            .await
            .map_err(|e| HandlerError::Execution(e.to_string()))?;
        info!(app = argument, killed, "closed application");
        Ok(())
    }
}
