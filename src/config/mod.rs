//! Configuration module for song-vocab.
//!
//! Handles loading application settings and the built-in prompt templates.

mod prompts;
mod settings;

pub use prompts::{LYRICS_AGENT_PROMPT, VOCABULARY_PROMPT};
pub use settings::{
    AgentSettings, GeneralSettings, LlmSettings, OutputSettings, SearchSettings, Settings,
};
