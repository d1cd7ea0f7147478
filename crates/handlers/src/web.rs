//! Search-result fetching and link extraction by string scanning.
//!
//! The pages involved are scanned for a handful of stable markers
//! (`href="..."` attributes, `/url?q=` redirect wrappers, `/watch?v=`
//! video ids), which keeps the HTTP surface at reqwest alone.

/// Desktop browser identity; search engines serve a stripped page to
/// unknown agents, with none of the markers we scan for.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

/// Build a web search results URL for a query.
pub fn search_url(query: &str) -> String {
    format!(
        "https://www.google.com/search?q={}",
        urlencoding::encode(query)
    )
}

/// Build a video search results URL for a query.
pub fn video_search_url(query: &str) -> String {
    format!(
        "https://www.youtube.com/results?search_query={}",
        urlencoding::encode(query)
    )
}

/// Fetch a page as text with a browser User-Agent.
pub async fn fetch_page(client: &reqwest::Client, url: &str) -> Result<String, reqwest::Error> {
    client
        .get(url)
        .header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await
}

/// Extract outbound result links from search-result HTML, in page order.
///
/// Handles the two shapes search engines emit: `/url?q=<target>&...`
/// redirect wrappers and plain absolute hrefs. Links back into the search
/// engine itself (navigation, account, image tabs) are skipped.
pub fn extract_links(html: &str) -> Vec<String> {
    let mut links = Vec::new();
    let mut rest = html;

    while let Some(pos) = rest.find("href=\"") {
        rest = &rest[pos + "href=\"".len()..];
        let Some(end) = rest.find('"') else { break };
        let href = &rest[..end];
        rest = &rest[end..];

        if let Some(wrapped) = href.strip_prefix("/url?q=") {
            let target = wrapped.split('&').next().unwrap_or(wrapped);
            if is_outbound(target) {
                links.push(target.to_string());
            }
        } else if is_outbound(href) {
            links.push(href.to_string());
        }
    }

    links
}

fn is_outbound(url: &str) -> bool {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return false;
    }
    let host = url
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .split('/')
        .next()
        .unwrap_or("");
    !host.contains("google.")
}

/// Extract the first playable video link from video search-result HTML.
///
/// Result pages embed ids as `/watch?v=<11 chars>` inside inline JSON;
/// the first occurrence is the top result.
pub fn first_video_link(html: &str) -> Option<String> {
    let pos = html.find("/watch?v=")?;
    let tail = &html[pos + "/watch?v=".len()..];
    let id: String = tail
        .chars()
        .take_while(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_'))
        .take(12)
        .collect();
    // Video ids are exactly 11 characters; a longer run is not a watch link.
    if id.len() != 11 {
        return None;
    }
    Some(format!("https://www.youtube.com/watch?v={id}"))
}
