//! song-vocab - Japanese song lyrics and vocabulary agent
//!
//! A tool-calling LLM agent that searches the web for song lyrics, extracts
//! study vocabulary and saves both for language learners.
//!
//! # Architecture
//!
//! - `agent` - Conversation controller, tool-call parser and executor
//! - `tools` - Tool registry, the standard tool set, rate limiting and retries
//! - `llm` - Chat model abstraction and the OpenAI-compatible backend
//! - `config` - Configuration management and prompts
//! - `orchestrator` - Wiring between settings, tools and the controller
//! - `cli` - Command-line interface and HTTP API
//!
//! The model drives the session with a textual protocol:
//! `Tool: name(arg="value", ...)` to call a tool, `FINISHED` to stop.
//!
//! # Example
//!
//! ```rust,no_run
//! use song_vocab::config::Settings;
//! use song_vocab::orchestrator::{Orchestrator, RunOptions};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let orchestrator = Orchestrator::new(Settings::load()?)?;
//!     let response = orchestrator
//!         .process_request("Find the lyrics for さくら by 森山直太朗", &RunOptions::default())
//!         .await?;
//!     println!("{}", response.content);
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod openai;
pub mod orchestrator;
pub mod tools;

pub use error::{Result, SongVocabError};
