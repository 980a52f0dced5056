//! Wiring for the lyrics agent.
//!
//! Owns the process-wide tool registry (and through it the shared search rate
//! limiter) and builds a conversation controller per request.

use crate::agent::{AgentResponse, ConversationController, ToolExecutor};
use crate::config::Settings;
use crate::error::{Result, SongVocabError};
use crate::llm::{ChatModel, OpenAIChat};
use crate::tools::{build_registry, search_rate_limiter, ToolRegistry};
use std::sync::Arc;
use tracing::{info, instrument};

/// Per-request overrides of the configured defaults.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub model: Option<String>,
    pub stream: Option<bool>,
    pub max_turns: Option<usize>,
}

/// Entry point for running agent sessions.
pub struct Orchestrator {
    settings: Settings,
    registry: Arc<ToolRegistry>,
}

impl Orchestrator {
    /// Create an orchestrator with the standard tool set.
    pub fn new(settings: Settings) -> Result<Self> {
        std::fs::create_dir_all(settings.lyrics_dir())?;
        std::fs::create_dir_all(settings.vocabulary_dir())?;
        info!(
            "Output directories ready: {}, {}",
            settings.lyrics_dir().display(),
            settings.vocabulary_dir().display()
        );

        let vocabulary_llm: Arc<dyn ChatModel> =
            Arc::new(OpenAIChat::new(&settings.llm)?.with_streaming(false));
        let registry = build_registry(&settings, vocabulary_llm, search_rate_limiter(&settings))?;

        Ok(Self::with_registry(settings, Arc::new(registry)))
    }

    /// Create an orchestrator around an existing registry.
    pub fn with_registry(settings: Settings, registry: Arc<ToolRegistry>) -> Self {
        Self { settings, registry }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> Arc<ToolRegistry> {
        Arc::clone(&self.registry)
    }

    /// Build a controller over the configured chat model.
    pub fn controller(&self, options: &RunOptions) -> Result<ConversationController> {
        let mut llm = OpenAIChat::new(&self.settings.llm)?;
        if let Some(model) = &options.model {
            llm = llm.with_model(model);
        }
        if let Some(stream) = options.stream {
            llm = llm.with_streaming(stream);
        }
        if self.settings.agent.native_tool_calls {
            llm = llm.with_tools(self.registry.definitions());
        }
        Ok(self.controller_with_model(Arc::new(llm), options))
    }

    /// Build a controller over any chat model.
    pub fn controller_with_model(
        &self,
        llm: Arc<dyn ChatModel>,
        options: &RunOptions,
    ) -> ConversationController {
        ConversationController::new(llm, ToolExecutor::new(self.registry()))
            .with_max_turns(options.max_turns.unwrap_or(self.settings.agent.max_turns))
            .with_max_iterations(self.settings.agent.max_iterations)
    }

    /// Run one agent session for a user request.
    #[instrument(skip(self, options))]
    pub async fn process_request(&self, message: &str, options: &RunOptions) -> Result<AgentResponse> {
        if message.trim().is_empty() {
            return Err(SongVocabError::InvalidInput("request must not be empty".to_string()));
        }
        let system_prompt = self.settings.system_prompt()?;
        self.controller(options)?.run(message, &system_prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_options_override_turns() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.output.lyrics_dir = Some(dir.path().join("l").to_string_lossy().to_string());
        settings.output.vocabulary_dir = Some(dir.path().join("v").to_string_lossy().to_string());

        let orchestrator = Orchestrator::new(settings).unwrap();
        assert!(dir.path().join("l").is_dir());
        assert_eq!(orchestrator.registry().len(), 5);

        let options = RunOptions {
            max_turns: Some(4),
            ..RunOptions::default()
        };
        assert_eq!(orchestrator.controller(&options).unwrap().max_turns(), 4);
        assert_eq!(orchestrator.controller(&RunOptions::default()).unwrap().max_turns(), 10);
    }

    #[tokio::test]
    async fn test_blank_request_rejected_before_model_call() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.output.lyrics_dir = Some(dir.path().join("l").to_string_lossy().to_string());
        settings.output.vocabulary_dir = Some(dir.path().join("v").to_string_lossy().to_string());

        let orchestrator = Orchestrator::new(settings).unwrap();
        let err = orchestrator
            .process_request("  \n", &RunOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SongVocabError::InvalidInput(_)));
    }
}
