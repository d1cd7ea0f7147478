//! Media playback handler - plays the top video result for a query.

use crate::{os, web};
use async_trait::async_trait;
use tracing::{info, warn};
use valet_core::{CommandKind, Handler, HandlerError};

/// Opens the best video match for a query directly, falling back to the
/// results page when the top result cannot be identified.
pub struct PlayMediaHandler {
    client: reqwest::Client,
}

impl PlayMediaHandler {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Handler for PlayMediaHandler {
    fn kind(&self) -> CommandKind {
        CommandKind::PlayMedia
    }

    fn description(&self) -> &str {
        "play a named video or song in the browser"
    }

    async fn run(&self, argument: &str) -> Result<(), HandlerError> {
        let results_url = web::video_search_url(argument);

        match web::fetch_page(&self.client, &results_url).await {
            Ok(html) => {
                if let Some(watch_url) = web::first_video_link(&html) {
                    info!(query = argument, url = %watch_url, "playing top video result");
                    return os::desktop::open_url(&watch_url)
                        .map_err(|e| HandlerError::Execution(e.to_string()));
                }
                warn!(query = argument, "no watch link in results, opening results page");
            }
            Err(e) => {
                warn!(query = argument, error = %e, "results fetch failed, opening results page");
            }
        }

        os::desktop::open_url(&results_url).map_err(|e| HandlerError::Execution(e.to_string()))
    }
}
