//! Rate-limited web search for lyrics pages.

use super::html::TextExtractor;
use super::rate_limit::RateLimiter;
use super::registry::Tool;
use super::retry::RetryPolicy;
use super::{optional_usize, required_arg};
use crate::agent::ToolArgs;
use crate::error::{Result, SongVocabError};
use async_trait::async_trait;
use regex::Regex;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Keywords appended to every query to bias results toward Japanese lyrics pages.
const JAPANESE_KEYWORDS: [&str; 3] = ["歌詞", "lyrics", "日本語"];

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// A web search provider.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run one search. Upstream throttling must surface as `RateLimited`.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>>;

    fn provider_name(&self) -> &'static str;
}

/// DuckDuckGo's HTML endpoint.
pub struct DuckDuckGo {
    client: reqwest::Client,
    endpoint: String,
    result_block: Regex,
    result_link: Regex,
    result_snippet: Regex,
    text: TextExtractor,
}

impl DuckDuckGo {
    pub fn new(client: reqwest::Client, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
            result_block: Regex::new(r#"<div[^>]*class="[^"]*\bresult\b[^"]*""#)
                .expect("result block pattern is valid"),
            result_link: Regex::new(r#"(?s)<a[^>]*class="result__a"[^>]*href="([^"]+)"[^>]*>(.*?)</a>"#)
                .expect("result link pattern is valid"),
            result_snippet: Regex::new(r#"(?s)<a[^>]*class="result__snippet"[^>]*>(.*?)</a>"#)
                .expect("result snippet pattern is valid"),
            text: TextExtractor::new(),
        }
    }

    /// Extract results from a result page, one `result` block at a time.
    pub fn parse_results(&self, html: &str, max_results: usize) -> Vec<SearchResult> {
        let starts: Vec<usize> = self.result_block.find_iter(html).map(|m| m.start()).collect();
        let ends = starts.iter().skip(1).copied().chain(std::iter::once(html.len()));

        starts
            .iter()
            .zip(ends)
            .filter_map(|(&start, end)| self.parse_block(&html[start..end]))
            .take(max_results)
            .collect()
    }

    /// A block without a result link is skipped; a missing snippet is empty.
    fn parse_block(&self, block: &str) -> Option<SearchResult> {
        let link = self.result_link.captures(block)?;
        let url = resolve_result_url(&self.text.inline_text(&link[1]))?;
        let snippet = self
            .result_snippet
            .captures(block)
            .map(|c| self.text.inline_text(&c[1]))
            .unwrap_or_default();

        Some(SearchResult {
            title: self.text.inline_text(&link[2]),
            url,
            snippet,
        })
    }
}

#[async_trait]
impl SearchBackend for DuckDuckGo {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        debug!("Requesting {} results from DuckDuckGo", max_results);
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("q", query)])
            .send()
            .await?;

        // DuckDuckGo answers throttled clients with 202 and an empty page.
        match response.status() {
            StatusCode::TOO_MANY_REQUESTS | StatusCode::ACCEPTED => {
                return Err(SongVocabError::RateLimited(format!(
                    "DuckDuckGo returned {}",
                    response.status()
                )));
            }
            status if !status.is_success() => {
                return Err(SongVocabError::Search(format!("DuckDuckGo returned {}", status)));
            }
            _ => {}
        }

        let html = response.text().await?;
        Ok(self.parse_results(&html, max_results))
    }

    fn provider_name(&self) -> &'static str {
        "duckduckgo"
    }
}

/// Result links point at a redirect (`//duckduckgo.com/l/?uddg=<target>`); return the target.
///
/// `href` must already have its entities decoded.
fn resolve_result_url(href: &str) -> Option<String> {
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.to_string()
    };

    let parsed = url::Url::parse(&absolute).ok()?;
    if parsed.path().starts_with("/l/") {
        parsed
            .query_pairs()
            .find(|(k, _)| k == "uddg")
            .map(|(_, v)| v.into_owned())
    } else {
        Some(parsed.to_string())
    }
}

/// `search_web_ddg`: search behind the shared rate limiter with backoff on throttling.
pub struct WebSearchTool {
    backend: Arc<dyn SearchBackend>,
    limiter: Arc<RateLimiter>,
    retry: RetryPolicy,
    max_results: usize,
}

impl WebSearchTool {
    pub fn new(backend: Arc<dyn SearchBackend>, limiter: Arc<RateLimiter>, retry: RetryPolicy) -> Self {
        Self {
            backend,
            limiter,
            retry,
            max_results: 5,
        }
    }

    /// Set the default maximum number of results.
    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    #[instrument(skip(self), fields(provider = self.backend.provider_name()))]
    pub async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        let enhanced = format!("{} {}", query, JAPANESE_KEYWORDS.join(" "));
        info!("Starting web search for: {}", enhanced);

        let query = enhanced.as_str();
        let limiter = &self.limiter;
        let backend = &self.backend;
        let results = self
            .retry
            .run(
                "search_web_ddg",
                move || async move {
                    limiter.admit().await;
                    backend.search(query, max_results).await
                },
                SongVocabError::is_transient,
            )
            .await?;

        info!("Found {} search results", results.len());
        for (i, result) in results.iter().enumerate() {
            debug!("Result {}: {} ({})", i + 1, result.title, result.url);
        }
        Ok(results)
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "search_web_ddg"
    }

    fn description(&self) -> &str {
        "Search the web for Japanese song lyrics. Returns title, url and snippet for each result."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query, e.g. the song title and artist"
                },
                "max_results": {
                    "type": "string",
                    "description": "Maximum number of results (default: 5)"
                }
            },
            "required": ["query"]
        })
    }

    async fn invoke(&self, args: &ToolArgs) -> Result<Value> {
        let query = required_arg(args, "query")?;
        let max_results = optional_usize(args, "max_results", self.max_results)?;
        let results = self.search(query, max_results).await?;
        Ok(serde_json::to_value(results)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    const RESULT_PAGE: &str = r#"
<div class="result results_links results_links_deep web-result ">
  <h2 class="result__title">
    <a rel="nofollow" class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.uta-net.com%2Fsong%2F12345%2F&amp;rut=abc">さくら <b>歌詞</b> - 森山直太朗</a>
  </h2>
  <a class="result__snippet" href="//duckduckgo.com/l/?uddg=x">さくら 作詞：森山直太朗 &amp; 御徒町凧</a>
</div>
<div class="result">
  <h2 class="result__title">
    <a rel="nofollow" class="result__a" href="https://example.com/sakura">Sakura lyrics</a>
  </h2>
  <a class="result__snippet" href="https://example.com/sakura">Romaji and translation</a>
</div>
"#;

    fn ddg() -> DuckDuckGo {
        DuckDuckGo::new(reqwest::Client::new(), "https://html.duckduckgo.com/html/")
    }

    #[test]
    fn test_parse_results() {
        let results = ddg().parse_results(RESULT_PAGE, 5);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "さくら 歌詞 - 森山直太朗");
        assert_eq!(results[0].url, "https://www.uta-net.com/song/12345/");
        assert_eq!(results[0].snippet, "さくら 作詞：森山直太朗 & 御徒町凧");
        assert_eq!(results[1].url, "https://example.com/sakura");
    }

    #[test]
    fn test_missing_snippet_does_not_shift_later_results() {
        let page = r#"
<div class="result results_links">
  <a class="result__a" href="https://example.com/no-snippet">No snippet here</a>
</div>
<div class="result results_links">
  <a class="result__a" href="https://example.com/kimigayo">君が代 &#27468;&#35422;</a>
  <a class="result__snippet" href="https://example.com/kimigayo">千代に八千代に</a>
</div>
"#;
        let results = ddg().parse_results(page, 5);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].snippet, "");
        assert_eq!(results[1].title, "君が代 歌詞");
        assert_eq!(results[1].snippet, "千代に八千代に");
    }

    #[test]
    fn test_parse_results_respects_limit() {
        assert_eq!(ddg().parse_results(RESULT_PAGE, 1).len(), 1);
        assert!(ddg().parse_results("<html></html>", 5).is_empty());
    }

    /// Fails with a rate limit a fixed number of times, then answers.
    struct FlakyBackend {
        failures: usize,
        calls: AtomicUsize,
        queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SearchBackend for FlakyBackend {
        async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
            self.queries.lock().unwrap().push(query.to_string());
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err(SongVocabError::RateLimited("202".to_string()));
            }
            Ok((0..max_results)
                .map(|i| SearchResult {
                    title: format!("hit {}", i),
                    url: format!("https://example.com/{}", i),
                    snippet: String::new(),
                })
                .collect())
        }

        fn provider_name(&self) -> &'static str {
            "flaky"
        }
    }

    fn tool(failures: usize) -> (WebSearchTool, Arc<FlakyBackend>) {
        let backend = Arc::new(FlakyBackend {
            failures,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        });
        let tool = WebSearchTool::new(
            backend.clone(),
            Arc::new(RateLimiter::new(30, Duration::from_millis(100))),
            RetryPolicy::default(),
        );
        (tool, backend)
    }

    #[tokio::test(start_paused = true)]
    async fn test_invoke_enhances_query_and_parses_limit() {
        let (tool, backend) = tool(0);
        let args = ToolArgs::from([
            ("query".to_string(), "さくら".to_string()),
            ("max_results".to_string(), "3".to_string()),
        ]);

        let value = tool.invoke(&args).await.unwrap();

        assert_eq!(value.as_array().unwrap().len(), 3);
        assert_eq!(backend.queries.lock().unwrap()[0], "さくら 歌詞 lyrics 日本語");
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_search_retries_then_succeeds() {
        let (tool, backend) = tool(2);
        let results = tool.search("さくら", 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_search_degrades_to_empty() {
        let (tool, backend) = tool(usize::MAX);
        let value = tool
            .invoke(&ToolArgs::from([("query".to_string(), "x".to_string())]))
            .await
            .unwrap();
        assert_eq!(value, json!([]));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_invalid_max_results() {
        let (tool, _) = tool(0);
        let args = ToolArgs::from([
            ("query".to_string(), "x".to_string()),
            ("max_results".to_string(), "many".to_string()),
        ]);
        assert!(matches!(
            tool.invoke(&args).await,
            Err(SongVocabError::InvalidArgument { .. })
        ));
    }
}
