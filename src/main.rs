//! song-vocab CLI entry point.

use anyhow::Result;
use clap::Parser;
use song_vocab::cli::{commands, Cli, Commands};
use song_vocab::config::Settings;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `-v` flags override `general.log_level`; `RUST_LOG` overrides both.
fn init_tracing(verbose: u8, configured: &str) {
    let level = match verbose {
        0 => configured,
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("song_vocab={}", level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.as_ref().map(PathBuf::from);
    let settings = Settings::load_from(config_path.as_ref())?;
    init_tracing(cli.verbose, &settings.general.log_level);

    std::fs::create_dir_all(settings.data_dir())?;

    match &cli.command {
        Commands::Agent {
            request,
            model,
            no_stream,
            max_turns,
        } => commands::run_agent(request, model.clone(), *no_stream, *max_turns, settings).await,
        Commands::Search { query, limit } => commands::run_search(query, *limit, settings).await,
        Commands::Tools => commands::run_tools(settings),
        Commands::Serve { host, port } => commands::run_serve(host, *port, settings).await,
        Commands::Config { action } => commands::run_config(action, cli.config.as_deref(), settings),
    }
}
