//! Uniform tool dispatch.

use super::types::ToolCall;
use crate::error::{Result, SongVocabError};
use crate::tools::ToolRegistry;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Looks up and invokes registered tools.
///
/// Blocking tools are already adapted to the async interface by the registry,
/// so every call here is a single await.
#[derive(Clone)]
pub struct ToolExecutor {
    registry: Arc<ToolRegistry>,
}

impl ToolExecutor {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Run a tool call. Fails with `UnknownTool` or `ToolExecution`.
    pub async fn execute(&self, call: &ToolCall) -> Result<Value> {
        let tool = self.registry.lookup(&call.name).ok_or_else(|| {
            warn!("Unknown tool requested: {}", call.name);
            SongVocabError::UnknownTool(call.name.clone())
        })?;

        info!("Executing tool {} with args: {:?}", call.name, call.args);
        match tool.invoke(&call.args).await {
            Ok(result) => {
                info!("Tool {} execution successful", call.name);
                Ok(result)
            }
            Err(e) => {
                error!("Tool {} execution failed: {}", call.name, e);
                Err(match e {
                    e @ SongVocabError::ToolExecution { .. } => e,
                    other => SongVocabError::ToolExecution {
                        tool: call.name.clone(),
                        cause: other.to_string(),
                    },
                })
            }
        }
    }
}
