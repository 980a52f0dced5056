//! Tools command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// List registered tools with their descriptions.
pub fn run_tools(settings: Settings) -> Result<()> {
    let orchestrator = Orchestrator::new(settings)?;
    let registry = orchestrator.registry();

    Output::header(&format!("Tools ({})", registry.len()));
    for name in registry.names() {
        if let Some(tool) = registry.lookup(name) {
            Output::kv(name, tool.description());
        }
    }
    println!();
    Output::info("Call format: Tool: name(arg=\"value\", ...)");

    Ok(())
}
