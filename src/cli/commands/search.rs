//! Search command implementation.

use crate::agent::{ToolArgs, ToolCall, ToolExecutor};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::tools::SearchResult;
use anyhow::Result;

/// Run the search tool once, through the same executor the agent uses.
pub async fn run_search(query: &str, limit: usize, settings: Settings) -> Result<()> {
    let orchestrator = Orchestrator::new(settings)?;
    let executor = ToolExecutor::new(orchestrator.registry());

    let call = ToolCall::new(
        "search_web_ddg",
        ToolArgs::from([
            ("query".to_string(), query.to_string()),
            ("max_results".to_string(), limit.to_string()),
        ]),
    );

    let spinner = Output::spinner("Searching...");
    let value = executor.execute(&call).await;
    spinner.finish_and_clear();

    let results: Vec<SearchResult> = serde_json::from_value(value?)?;
    if results.is_empty() {
        Output::warning("No results (the search may have been rate limited).");
        return Ok(());
    }

    Output::header(&format!("Results for: {}", query));
    for (i, result) in results.iter().enumerate() {
        Output::search_result(i + 1, &result.title, &result.url, &result.snippet);
    }
    println!();

    Ok(())
}
