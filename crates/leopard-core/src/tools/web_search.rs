//! Web search tool - DuckDuckGo HTML scraping (no API key required)
//!
//! The query is POSTed as a form to the HTML endpoint; GET requests with
//! non-ASCII queries tend to get a CAPTCHA page instead of results.

use super::{Tool, ToolDefinition, ToolResult};
use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Upper bound for `max_results`
const MAX_RESULTS_CAP: usize = 10;

/// User-Agent header to avoid bot blocking
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<a[^>]+class="result__a"[^>]+href="([^"]*)"[^>]*>(.*?)</a>"#)
        .expect("title regex is a compile-time constant")
});

static SNIPPET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<a[^>]+class="result__snippet"[^>]*>(.*?)</a>"#)
        .expect("snippet regex is a compile-time constant")
});

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag regex is a compile-time constant"));

/// Search settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// HTML search endpoint
    pub endpoint: String,
    /// DuckDuckGo region code (`wt-wt` = no region)
    pub region: String,
    /// Results per query
    pub max_results: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://html.duckduckgo.com/html/".to_string(),
            region: "wt-wt".to_string(),
            max_results: 5,
            timeout_secs: 15,
        }
    }
}

/// A single search result entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Result title
    pub title: String,
    /// Destination URL
    pub url: String,
    /// Short description
    pub snippet: String,
}

/// DuckDuckGo HTML-based web search tool
pub struct WebSearchTool {
    definition: ToolDefinition,
    config: SearchConfig,
    client: reqwest::Client,
}

impl WebSearchTool {
    /// Create a search tool
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built
    pub fn new(config: SearchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Tool(format!("failed to build HTTP client: {}", e)))?;

        let definition = ToolDefinition::new(
            "web_search",
            "Search the internet for current information about animals, distances, \
             speeds, landmarks, bridges, and other factual data.",
        );

        Ok(Self {
            definition,
            config,
            client,
        })
    }

    /// The tool's settings
    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    async fn fetch(&self, query: &str) -> Result<std::result::Result<String, String>> {
        let form_data = format!(
            "q={}&kl={}",
            urlencoding::encode(query),
            urlencoding::encode(&self.config.region),
        );

        debug!(query = %query, endpoint = %self.config.endpoint, "Fetching search results");

        let response = self
            .client
            .post(&self.config.endpoint)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .header(reqwest::header::REFERER, "https://html.duckduckgo.com/")
            .body(form_data)
            .send()
            .await
            .map_err(|e| Error::Tool(format!("search request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Ok(Err(format!("search endpoint returned HTTP {}", status.as_u16())));
        }

        let html = response
            .text()
            .await
            .map_err(|e| Error::Tool(format!("failed to read search response: {}", e)))?;
        debug!(html_len = html.len(), "Search response received");

        if html.contains("anomaly-modal") {
            warn!("DuckDuckGo returned CAPTCHA page");
            return Ok(Err(
                "CAPTCHA triggered; search temporarily blocked".to_string()
            ));
        }

        Ok(Ok(html))
    }
}

#[async_trait::async_trait]
impl Tool for WebSearchTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult> {
        let start = Instant::now();

        let query = input
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::Tool("Missing 'query' parameter".to_string()))?;

        if query.trim().is_empty() {
            return Err(Error::Tool("Query must not be empty".to_string()));
        }

        let max_results = input
            .get("max_results")
            .and_then(|v| v.as_u64())
            .map_or(self.config.max_results, |n| n as usize)
            .clamp(1, MAX_RESULTS_CAP);

        info!(query = %query, "Searching the web");

        let html = match self.fetch(query).await? {
            Ok(html) => html,
            Err(reason) => {
                return Ok(ToolResult::failure(
                    reason,
                    start.elapsed().as_millis() as u64,
                ))
            }
        };

        let results = parse_search_results(&html, max_results);
        let duration = start.elapsed().as_millis() as u64;

        Ok(ToolResult::success(
            serde_json::json!({
                "query": query,
                "results": results,
                "total": results.len(),
            }),
            duration,
        ))
    }

    fn render(&self, result: &ToolResult) -> String {
        let results: Vec<SearchResult> = result
            .output
            .get("results")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default();
        format_results(&results)
    }

    fn render_failure(&self, reason: &str) -> String {
        format!("Search failed: {}", reason)
    }
}

/// Render results as `- title: snippet` lines
pub(crate) fn format_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "No results found.".to_string();
    }

    results
        .iter()
        .map(|r| {
            let title = if r.title.is_empty() { "No title" } else { &r.title };
            let snippet = if r.snippet.is_empty() {
                "No description"
            } else {
                &r.snippet
            };
            format!("- {}: {}", title, snippet)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse search results from DuckDuckGo HTML
fn parse_search_results(html: &str, max_results: usize) -> Vec<SearchResult> {
    // Title:   <a class="result__a" href="...">TITLE</a>
    // Snippet: <a class="result__snippet">SNIPPET</a>
    let snippets: Vec<String> = SNIPPET_RE
        .captures_iter(html)
        .map(|cap| strip_html_tags(cap.get(1).map_or("", |m| m.as_str())))
        .collect();

    TITLE_RE
        .captures_iter(html)
        .enumerate()
        .map(|(i, cap)| SearchResult {
            url: extract_real_url(cap.get(1).map_or("", |m| m.as_str())),
            title: strip_html_tags(cap.get(2).map_or("", |m| m.as_str())),
            snippet: snippets.get(i).cloned().unwrap_or_default(),
        })
        .filter(|r| !r.url.is_empty() && !r.title.is_empty())
        .take(max_results)
        .collect()
}

/// DuckDuckGo wraps URLs in a redirect: `//duckduckgo.com/l/?uddg=REAL_URL&...`
fn extract_real_url(raw: &str) -> String {
    let Some(pos) = raw.find("uddg=") else {
        return raw.to_string();
    };
    let rest = &raw[pos + 5..];
    let encoded = &rest[..rest.find('&').unwrap_or(rest.len())];
    urlencoding::decode(encoded)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| encoded.to_string())
}

/// Remove HTML tags and decode common HTML entities
fn strip_html_tags(s: &str) -> String {
    TAG_RE
        .replace_all(s, "")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
        .trim()
        .to_string()
}
