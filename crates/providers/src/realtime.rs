//! Search-augmented chat - answers from scraped live results.
//!
//! Results come from the static DuckDuckGo HTML endpoint, scanned for
//! `result__a` anchors. No HTML parser; the markers are stable and the
//! extraction is a few string finds.

use crate::chat::{clock_preamble, tidy_answer};
use crate::traits::{ChatModel, Message, ProviderError};
use std::sync::Arc;
use tracing::{debug, warn};
use valet_memory::ChatLog;

const RESULT_LIMIT: usize = 5;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

#[derive(Debug, PartialEq)]
struct SearchHit {
    title: String,
    url: String,
}

fn strip_tags(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for ch in fragment.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.trim().to_string()
}

/// Undo the engine's redirect wrapper (`uddg=` carries the target,
/// percent-encoded) and scheme-relative prefixes.
fn clean_result_url(href: &str) -> String {
    if let Some(pos) = href.find("uddg=") {
        let tail = &href[pos + "uddg=".len()..];
        let encoded = tail.split('&').next().unwrap_or(tail);
        if let Ok(decoded) = urlencoding::decode(encoded) {
            return decoded.into_owned();
        }
    }
    if let Some(stripped) = href.strip_prefix("//") {
        return format!("https://{stripped}");
    }
    href.to_string()
}

fn scan_results(html: &str, limit: usize) -> Vec<SearchHit> {
    let mut hits = Vec::new();
    let mut rest = html;

    while hits.len() < limit {
        let Some(pos) = rest.find("class=\"result__a\"") else {
            break;
        };
        rest = &rest[pos..];
        let Some(href_pos) = rest.find("href=\"") else {
            break;
        };
        rest = &rest[href_pos + "href=\"".len()..];
        let Some(href_end) = rest.find('"') else {
            break;
        };
        let href = &rest[..href_end];
        rest = &rest[href_end..];
        let Some(gt) = rest.find('>') else {
            break;
        };
        rest = &rest[gt + 1..];
        let Some(close) = rest.find("</a>") else {
            break;
        };
        let title = strip_tags(&rest[..close]);
        rest = &rest[close..];

        if !title.is_empty() {
            hits.push(SearchHit {
                title,
                url: clean_result_url(href),
            });
        }
    }

    hits
}

fn context_block(query: &str, hits: &[SearchHit]) -> String {
    let mut block = format!("The search results for '{query}' are :\n[start]\n");
    for hit in hits {
        block.push_str(&format!("Title : {}\nUrl : {}\n\n", hit.title, hit.url));
    }
    block.push_str("[end]");
    block
}

/// Chat with a fresh search-results block injected each turn.
pub struct RealtimeChat {
    model: Arc<dyn ChatModel>,
    client: reqwest::Client,
    assistant_name: String,
    user_name: String,
    history_limit: usize,
}

impl RealtimeChat {
    pub fn new(
        model: Arc<dyn ChatModel>,
        client: reqwest::Client,
        assistant_name: impl Into<String>,
        user_name: impl Into<String>,
        history_limit: usize,
    ) -> Self {
        Self {
            model,
            client,
            assistant_name: assistant_name.into(),
            user_name: user_name.into(),
            history_limit,
        }
    }

    fn persona_preamble(&self) -> String {
        format!(
            "Hello, I am {}, You are a very accurate and advanced AI assistant named {} \
             which has real-time up-to-date information from the internet.\n\
             *** Provide Answers In a Professional Way, make sure to add full stops, commas, \
             question marks, and use proper grammar. ***\n\
             *** Just answer the question from the provided data in a professional way. ***",
            self.user_name, self.assistant_name
        )
    }

    async fn search_context(&self, query: &str) -> Result<String, ProviderError> {
        let url = format!(
            "https://html.duckduckgo.com/html/?q={}",
            urlencoding::encode(query)
        );
        let html = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?
            .error_for_status()
            .map_err(|e| ProviderError::Http(e.to_string()))?
            .text()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        let hits = scan_results(&html, RESULT_LIMIT);
        debug!(query, hits = hits.len(), "scraped search results");
        Ok(context_block(query, &hits))
    }

    /// Answer a query with live search context. A failed search degrades
    /// to a plain reply rather than failing the turn.
    pub async fn reply(&self, log: &ChatLog, query: &str) -> Result<String, ProviderError> {
        let mut messages = vec![Message::system(self.persona_preamble())];

        match self.search_context(query).await {
            Ok(block) => messages.push(Message::system(block)),
            Err(e) => warn!(error = %e, "search unavailable, replying without live context"),
        }

        messages.push(Message::system(clock_preamble()));
        for entry in log.recent(self.history_limit) {
            messages.push(Message {
                role: entry.role.clone(),
                content: entry.content.clone(),
            });
        }
        messages.push(Message::user(query));

        let answer = self.model.reply(&messages).await?;
        Ok(tidy_answer(&answer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = concat!(
        r#"<a rel="nofollow" class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fen.wikipedia.org%2Fwiki%2FRust&rut=abc">Rust <b>language</b></a>"#,
        r#"<a rel="nofollow" class="result__a" href="https://www.rust-lang.org/">Rust Programming Language</a>"#,
    );

    #[test]
    fn test_scan_results_extracts_title_and_url() {
        let hits = scan_results(SAMPLE, 5);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "Rust language");
        assert_eq!(hits[0].url, "https://en.wikipedia.org/wiki/Rust");
        assert_eq!(hits[1].title, "Rust Programming Language");
        assert_eq!(hits[1].url, "https://www.rust-lang.org/");
    }

    #[test]
    fn test_scan_results_honors_limit() {
        let hits = scan_results(SAMPLE, 1);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_scan_results_empty_page() {
        assert!(scan_results("<html><body>nothing</body></html>", 5).is_empty());
    }

    #[test]
    fn test_context_block_is_delimited() {
        let hits = vec![SearchHit {
            title: "Example".to_string(),
            url: "https://example.com".to_string(),
        }];
        let block = context_block("example", &hits);
        assert!(block.starts_with("The search results for 'example' are :\n[start]\n"));
        assert!(block.ends_with("[end]"));
        assert!(block.contains("Title : Example\nUrl : https://example.com"));
    }

    #[test]
    fn test_clean_result_url_decodes_redirect() {
        assert_eq!(
            clean_result_url("//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Fpage&rut=x"),
            "https://example.com/page"
        );
        assert_eq!(
            clean_result_url("https://direct.example/"),
            "https://direct.example/"
        );
    }
}
