//! Fetch a web page and return its visible text.

use super::html::TextExtractor;
use super::registry::Tool;
use super::required_arg;
use crate::agent::ToolArgs;
use crate::error::{Result, SongVocabError};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, info, instrument};

/// Characters of page text handed back to the model.
const DEFAULT_MAX_CHARS: usize = 8000;

/// `get_page_content`: GET a page and strip it down to text.
pub struct PageContentTool {
    client: reqwest::Client,
    text: TextExtractor,
    max_chars: usize,
}

impl PageContentTool {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            text: TextExtractor::new(),
            max_chars: DEFAULT_MAX_CHARS,
        }
    }

    pub fn with_max_chars(mut self, max: usize) -> Self {
        self.max_chars = max;
        self
    }

    /// Visible text of `html`, truncated to the character budget.
    pub fn extract(&self, html: &str) -> String {
        let text = self.text.page_text(html);
        if text.chars().count() <= self.max_chars {
            text
        } else {
            text.chars().take(self.max_chars).collect()
        }
    }

    #[instrument(skip(self))]
    async fn fetch(&self, url: &url::Url) -> Result<String> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await?
            .error_for_status()?;
        let html = response.text().await?;
        debug!("Fetched {} bytes", html.len());
        Ok(self.extract(&html))
    }
}

/// Only absolute http(s) URLs are fetched.
fn parse_page_url(raw: &str) -> Result<url::Url> {
    let parsed = url::Url::parse(raw.trim()).map_err(|e| SongVocabError::InvalidArgument {
        name: "url".to_string(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(SongVocabError::InvalidArgument {
            name: "url".to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

#[async_trait]
impl Tool for PageContentTool {
    fn name(&self) -> &str {
        "get_page_content"
    }

    fn description(&self) -> &str {
        "Fetch a web page and return its visible text content."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "url": { "type": "string", "description": "Absolute http(s) URL" }
            },
            "required": ["url"]
        })
    }

    async fn invoke(&self, args: &ToolArgs) -> Result<Value> {
        let url = parse_page_url(required_arg(args, "url")?)?;
        info!("Fetching page content: {}", url);
        let content = self.fetch(&url).await?;
        Ok(json!({ "url": url.as_str(), "content": content }))
    }
}
