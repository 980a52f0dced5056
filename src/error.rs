//! Error types for song-vocab.

use thiserror::Error;

/// Library-level error type for song-vocab operations.
#[derive(Error, Debug)]
pub enum SongVocabError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Chat model transport or API failure.
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Tool {tool} failed: {cause}")]
    ToolExecution { tool: String, cause: String },

    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument { name: String, reason: String },

    #[error("Upstream rate limit: {0}")]
    RateLimited(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Reached maximum number of turns ({0}) without completing the task")]
    MaxTurnsExceeded(usize),

    #[error("Agent exceeded maximum loop iterations ({0})")]
    IterationLimitExceeded(usize),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl SongVocabError {
    /// Whether this error is worth retrying after a pause.
    pub fn is_transient(&self) -> bool {
        matches!(self, SongVocabError::RateLimited(_))
    }
}

/// Result type alias for song-vocab operations.
pub type Result<T> = std::result::Result<T, SongVocabError>;
