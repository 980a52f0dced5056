//! Configuration settings for song-vocab.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub llm: LlmSettings,
    pub agent: AgentSettings,
    pub search: SearchSettings,
    pub output: OutputSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.song-vocab".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

/// Chat model endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Model identifier sent with every chat request.
    pub model: String,
    /// Base URL of an OpenAI-compatible API (OpenAI, Ollama `/v1`, ...).
    pub api_base: String,
    /// API key. Falls back to `OPENAI_API_KEY`, then a placeholder for local servers.
    pub api_key: Option<String>,
    /// Stream completions and accumulate the text before parsing.
    pub stream: bool,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "llama3.2:3b".to_string(),
            api_base: "http://localhost:11434/v1".to_string(),
            api_key: None,
            stream: true,
            timeout_secs: 300,
        }
    }
}

/// Conversation controller settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Productive turns (successful tool dispatches) allowed per session.
    pub max_turns: usize,
    /// Hard ceiling on loop iterations, counting corrective passes.
    pub max_iterations: usize,
    /// Advertise tools as native function definitions to the model.
    pub native_tool_calls: bool,
    /// Optional file overriding the built-in system prompt.
    pub prompt_path: Option<String>,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_turns: 10,
            max_iterations: 30,
            native_tool_calls: false,
            prompt_path: None,
        }
    }
}

/// Web search tool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// DuckDuckGo HTML endpoint.
    pub endpoint: String,
    /// Sliding-window cap shared by every search in the process.
    pub requests_per_minute: usize,
    /// Minimum spacing between two searches, in milliseconds.
    pub min_interval_ms: u64,
    /// Attempts made against a rate-limited upstream before giving up.
    pub max_retries: u32,
    /// Base backoff delay in seconds.
    pub base_delay_secs: u64,
    /// Backoff ceiling in seconds.
    pub max_delay_secs: u64,
    /// Default number of results when the model does not ask for a count.
    pub max_results: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://html.duckduckgo.com/html/".to_string(),
            requests_per_minute: 30,
            min_interval_ms: 100,
            max_retries: 3,
            base_delay_secs: 2,
            max_delay_secs: 10,
            max_results: 5,
        }
    }
}

impl SearchSettings {
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    pub fn base_delay(&self) -> Duration {
        Duration::from_secs(self.base_delay_secs)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_secs(self.max_delay_secs)
    }
}

/// Where `save_results` writes its files. Unset directories live under `general.data_dir`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub lyrics_dir: Option<String>,
    pub vocabulary_dir: Option<String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::SongVocabError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("song-vocab")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// `output.lyrics_dir`, or `<data_dir>/outputs/lyrics`.
    pub fn lyrics_dir(&self) -> PathBuf {
        self.output_dir(self.output.lyrics_dir.as_deref(), "lyrics")
    }

    /// `output.vocabulary_dir`, or `<data_dir>/outputs/vocabulary`.
    pub fn vocabulary_dir(&self) -> PathBuf {
        self.output_dir(self.output.vocabulary_dir.as_deref(), "vocabulary")
    }

    fn output_dir(&self, configured: Option<&str>, name: &str) -> PathBuf {
        match configured {
            Some(path) => Self::expand_path(path),
            None => self.data_dir().join("outputs").join(name),
        }
    }

    /// The agent system prompt: the override file when configured, the built-in one otherwise.
    pub fn system_prompt(&self) -> crate::error::Result<String> {
        match &self.agent.prompt_path {
            Some(path) => Ok(std::fs::read_to_string(Self::expand_path(path))?),
            None => Ok(super::prompts::LYRICS_AGENT_PROMPT.to_string()),
        }
    }
}
