//! Tool call types shared by the parser, the executor and the chat backends.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Tool arguments. Every value is a string at this boundary.
pub type ToolArgs = HashMap<String, String>;

/// A structured request to run one tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    pub args: ToolArgs,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, args: ToolArgs) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Build a call from native function-call output.
    ///
    /// Strings are taken verbatim, other scalars by their JSON text. Arguments
    /// that are not a JSON object yield an empty map, like a malformed textual call.
    pub fn from_json_arguments(name: &str, arguments: &str) -> Self {
        let args = match serde_json::from_str::<serde_json::Value>(arguments) {
            Ok(serde_json::Value::Object(map)) => map
                .into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| {
                    let value = match v {
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    };
                    (k, value)
                })
                .collect(),
            Ok(_) | Err(_) => {
                warn!("Ignoring malformed arguments for tool {}: {}", name, arguments);
                ToolArgs::new()
            }
        };
        Self::new(name, args)
    }
}

/// Renders the call in the textual tool protocol, keys sorted.
impl std::fmt::Display for ToolCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<_> = self.args.keys().collect();
        keys.sort();
        let rendered = keys
            .into_iter()
            .map(|k| format!("{}=\"{}\"", k, self.args[k]))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "Tool: {}({})", self.name, rendered)
    }
}

/// Record of a tool call made by the agent.
#[derive(Debug, Clone, Serialize)]
pub struct ToolCallRecord {
    /// Name of the tool called.
    pub name: String,
    /// Arguments passed to the tool.
    pub arguments: ToolArgs,
    /// Serialized result, or the error text.
    pub result: String,
    /// Whether the call succeeded.
    pub success: bool,
}

impl std::fmt::Display for ToolCallRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut args: Vec<_> = self.arguments.iter().collect();
        args.sort();
        let rendered = args
            .into_iter()
            .map(|(k, v)| format!("{}={:?}", k, v))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}({})", self.name, rendered)
    }
}
