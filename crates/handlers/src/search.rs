//! Search handlers - open web or video search results in the browser.
//!
//! Both are best-effort: a browser that fails to open is logged and the
//! task still counts as done, since nothing can be retried meaningfully.

use crate::{os, web};
use async_trait::async_trait;
use tracing::{info, warn};
use valet_core::{CommandKind, Handler, HandlerError};

pub struct WebSearchHandler;

#[async_trait]
impl Handler for WebSearchHandler {
    fn kind(&self) -> CommandKind {
        CommandKind::WebSearch
    }

    fn description(&self) -> &str {
        "open web search results for a query"
    }

    async fn run(&self, argument: &str) -> Result<(), HandlerError> {
        let url = web::search_url(argument);
        match os::desktop::open_url(&url) {
            Ok(()) => info!(query = argument, "opened web search"),
            Err(e) => warn!(query = argument, error = %e, "could not open browser for search"),
        }
        Ok(())
    }
}

pub struct VideoSearchHandler;

#[async_trait]
impl Handler for VideoSearchHandler {
    fn kind(&self) -> CommandKind {
        CommandKind::VideoSearch
    }

    fn description(&self) -> &str {
        "open video search results for a query"
    }

    async fn run(&self, argument: &str) -> Result<(), HandlerError> {
        let url = web::video_search_url(argument);
        match os::desktop::open_url(&url) {
            Ok(()) => info!(query = argument, "opened video search"),
            Err(e) => warn!(query = argument, error = %e, "could not open browser for search"),
        }
        Ok(())
    }
}
