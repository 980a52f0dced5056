//! Tools available to the lyrics agent, and the throttling they share.
//!
//! Every tool implements [`Tool`]. Synchronous bodies are wrapped in
//! [`BlockingTool`]. [`build_registry`] wires the standard tool set with its
//! configuration; nothing is rebound per call.

mod html;
mod page;
mod rate_limit;
mod registry;
mod retry;
mod save;
mod search;
mod song_id;
mod vocabulary;

pub use page::PageContentTool;
pub use rate_limit::RateLimiter;
pub use registry::{BlockingTool, Tool, ToolRegistry};
pub use retry::RetryPolicy;
pub use save::{save_results, save_results_tool, SaveResultsConfig, SavedFiles};
pub use search::{DuckDuckGo, SearchBackend, SearchResult, WebSearchTool};
pub use song_id::{generate_song_id, song_id_tool};
pub use vocabulary::{parse_vocabulary, VocabularyItem, VocabularyPart, VocabularyTool};

use crate::agent::ToolArgs;
use crate::config::Settings;
use crate::error::{Result, SongVocabError};
use crate::llm::ChatModel;
use std::sync::Arc;
use std::time::Duration;

const USER_AGENT: &str = concat!("song-vocab/", env!("CARGO_PKG_VERSION"));
const HTTP_TIMEOUT_SECS: u64 = 30;

/// Fetch a required argument.
pub fn required_arg<'a>(args: &'a ToolArgs, name: &str) -> Result<&'a str> {
    args.get(name)
        .map(String::as_str)
        .ok_or_else(|| SongVocabError::InvalidArgument {
            name: name.to_string(),
            reason: "missing".to_string(),
        })
}

/// Parse an optional numeric argument, falling back to `default` when absent or blank.
pub fn optional_usize(args: &ToolArgs, name: &str, default: usize) -> Result<usize> {
    match args.get(name).map(|v| v.trim()) {
        None | Some("") => Ok(default),
        Some(value) => value.parse().map_err(|_| SongVocabError::InvalidArgument {
            name: name.to_string(),
            reason: format!("'{}' is not a number", value),
        }),
    }
}

/// The rate limiter guarding web search, built from `[search]`.
pub fn search_rate_limiter(settings: &Settings) -> Arc<RateLimiter> {
    Arc::new(RateLimiter::new(
        settings.search.requests_per_minute,
        settings.search.min_interval(),
    ))
}

/// Build the standard tool set.
///
/// `limiter` is shared with every other registry built from it, so the search
/// cap holds across concurrent sessions. `llm` backs `extract_vocabulary`.
pub fn build_registry(
    settings: &Settings,
    llm: Arc<dyn ChatModel>,
    limiter: Arc<RateLimiter>,
) -> Result<ToolRegistry> {
    let http = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()?;

    let retry = RetryPolicy::new(
        settings.search.max_retries,
        settings.search.base_delay(),
        settings.search.max_delay(),
    );
    let backend = Arc::new(DuckDuckGo::new(http.clone(), &settings.search.endpoint));

    let mut registry = ToolRegistry::new();
    registry.register(
        WebSearchTool::new(backend, limiter, retry).with_max_results(settings.search.max_results),
    );
    registry.register(PageContentTool::new(http));
    registry.register(VocabularyTool::new(llm));
    registry.register(song_id_tool());
    registry.register(save_results_tool(SaveResultsConfig {
        lyrics_dir: settings.lyrics_dir(),
        vocabulary_dir: settings.vocabulary_dir(),
    }));
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{Message, ModelReply};
    use async_trait::async_trait;

    struct SilentModel;

    #[async_trait]
    impl ChatModel for SilentModel {
        async fn complete(&self, _messages: &[Message]) -> Result<ModelReply> {
            Ok(ModelReply::default())
        }
    }

    #[test]
    fn test_build_registry_names() {
        let settings = Settings::default();
        let registry =
            build_registry(&settings, Arc::new(SilentModel), search_rate_limiter(&settings)).unwrap();
        assert_eq!(
            registry.names(),
            vec![
                "extract_vocabulary",
                "generate_song_id",
                "get_page_content",
                "save_results",
                "search_web_ddg",
            ]
        );
        assert_eq!(registry.definitions().len(), 5);
    }

    #[test]
    fn test_optional_usize() {
        let args = ToolArgs::from([
            ("n".to_string(), " 7 ".to_string()),
            ("blank".to_string(), "".to_string()),
            ("bad".to_string(), "seven".to_string()),
        ]);
        assert_eq!(optional_usize(&args, "n", 5).unwrap(), 7);
        assert_eq!(optional_usize(&args, "blank", 5).unwrap(), 5);
        assert_eq!(optional_usize(&args, "missing", 5).unwrap(), 5);
        assert!(optional_usize(&args, "bad", 5).is_err());
    }
}
