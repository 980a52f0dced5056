//! Agent command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::{Orchestrator, RunOptions};
use anyhow::Result;

/// Run the agent command.
pub async fn run_agent(
    request: &str,
    model: Option<String>,
    no_stream: bool,
    max_turns: Option<usize>,
    settings: Settings,
) -> Result<()> {
    let orchestrator = Orchestrator::new(settings)?;
    let options = RunOptions {
        model,
        stream: no_stream.then_some(false),
        max_turns,
    };

    let spinner = Output::spinner("Agent working...");

    match orchestrator.process_request(request, &options).await {
        Ok(response) => {
            spinner.finish_and_clear();

            println!("\n{}\n", response.content);

            if !response.tool_calls.is_empty() {
                Output::header(&format!("Tool calls ({})", response.tool_calls.len()));
                for call in &response.tool_calls {
                    Output::tool_call(&call.to_string(), call.success);
                }
                println!();
            }

            Output::session_summary(response.turns, response.iterations);
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Agent failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
