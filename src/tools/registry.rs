//! Tool trait, blocking-body adapter and the name -> tool registry.

use crate::agent::ToolArgs;
use crate::error::{Result, SongVocabError};
use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// A tool the agent can call.
///
/// Configuration (paths, clients, shared limiters) is supplied when the tool
/// is constructed; `invoke` only ever receives the model's arguments.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON schema of the arguments, for native function calling.
    fn parameters(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn invoke(&self, args: &ToolArgs) -> Result<Value>;
}

type BlockingBody = dyn Fn(ToolArgs) -> Result<Value> + Send + Sync;

/// Adapts a synchronous tool body to [`Tool`] by running it on tokio's blocking pool.
pub struct BlockingTool {
    name: String,
    description: String,
    parameters: Value,
    body: Arc<BlockingBody>,
}

impl BlockingTool {
    pub fn new<F>(name: &str, description: &str, body: F) -> Self
    where
        F: Fn(ToolArgs) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            parameters: json!({ "type": "object", "properties": {} }),
            body: Arc::new(body),
        }
    }

    pub fn with_parameters(mut self, parameters: Value) -> Self {
        self.parameters = parameters;
        self
    }
}

#[async_trait]
impl Tool for BlockingTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> Value {
        self.parameters.clone()
    }

    async fn invoke(&self, args: &ToolArgs) -> Result<Value> {
        let body = Arc::clone(&self.body);
        let args = args.clone();
        tokio::task::spawn_blocking(move || body(args))
            .await
            .map_err(|e| SongVocabError::ToolExecution {
                tool: self.name.clone(),
                cause: e.to_string(),
            })?
    }
}

/// Registered tools by name.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any tool with the same name.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.register_shared(Arc::new(tool));
    }

    pub fn register_shared(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Registered tool names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Function definitions for every tool, sorted by name.
    pub fn definitions(&self) -> Vec<ChatCompletionTool> {
        self.names()
            .into_iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| ChatCompletionTool {
                r#type: ChatCompletionToolType::Function,
                function: FunctionObject {
                    name: tool.name().to_string(),
                    description: Some(tool.description().to_string()),
                    parameters: Some(tool.parameters()),
                    strict: None,
                },
            })
            .collect()
    }
}
