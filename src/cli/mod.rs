//! CLI module for song-vocab.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// song-vocab - find Japanese song lyrics and build vocabulary lists
///
/// Runs a tool-calling LLM agent that searches the web for lyrics, extracts
/// vocabulary and saves both to disk.
#[derive(Parser, Debug)]
#[command(name = "song-vocab")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the lyrics agent on a request (e.g. "Find lyrics for さくら by 森山直太朗")
    Agent {
        /// The request for the agent
        request: String,

        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,

        /// Wait for whole completions instead of streaming tokens
        #[arg(long)]
        no_stream: bool,

        /// Maximum productive turns for this session
        #[arg(long)]
        max_turns: Option<usize>,
    },

    /// Run the rate-limited web search tool directly
    Search {
        /// Search query (lyrics keywords are appended automatically)
        query: String,

        /// Maximum number of results
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },

    /// List the tools available to the agent
    Tools,

    /// Start HTTP API server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8000")]
        port: u16,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the current configuration to the config file
    Init,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_agent_command() {
        let cli = Cli::parse_from(["song-vocab", "-vv", "agent", "さくら", "--no-stream", "--max-turns", "5"]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Agent {
                request,
                no_stream,
                max_turns,
                model,
            } => {
                assert_eq!(request, "さくら");
                assert!(no_stream);
                assert_eq!(max_turns, Some(5));
                assert!(model.is_none());
            }
            other => panic!("Expected Agent command, got {:?}", other),
        }
    }
}
