//! Bounded-turn conversation loop.

use super::conversation::{AgentState, Session};
use super::executor::ToolExecutor;
use super::parser::ActionParser;
use super::types::ToolCallRecord;
use crate::error::{Result, SongVocabError};
use crate::llm::{ChatModel, Message};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument};

/// Marker the model uses to signal the task is complete.
pub const FINISHED_SENTINEL: &str = "FINISHED";

/// Injected when a reply carries neither a tool call nor the sentinel.
pub const NO_ACTION_PROMPT: &str = "Please specify a tool to use or indicate FINISHED if done.";

const DEFAULT_MAX_TURNS: usize = 10;
const DEFAULT_MAX_ITERATIONS: usize = 30;

/// Result of a single loop iteration.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// The model signalled completion with this text.
    Finished(String),
    /// A tool ran and its result was appended; the turn advanced.
    Advanced,
    /// A corrective message was appended; the turn did not advance.
    Corrected,
}

/// Drives the request/parse/execute/append cycle for one session at a time.
pub struct ConversationController {
    llm: Arc<dyn ChatModel>,
    executor: ToolExecutor,
    parser: ActionParser,
    max_turns: usize,
    max_iterations: usize,
}

impl ConversationController {
    pub fn new(llm: Arc<dyn ChatModel>, executor: ToolExecutor) -> Self {
        Self {
            llm,
            executor,
            parser: ActionParser::new(),
            max_turns: DEFAULT_MAX_TURNS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Set the number of productive turns allowed per session.
    pub fn with_max_turns(mut self, max: usize) -> Self {
        self.max_turns = max;
        self
    }

    /// Set the hard ceiling on loop iterations, corrective passes included.
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    /// Run a fresh session for `user_message`.
    pub async fn run(&self, user_message: &str, system_prompt: &str) -> Result<AgentResponse> {
        let mut session = Session::new(system_prompt, user_message);
        let span = info_span!("session", id = %session.id);
        self.drive(&mut session).instrument(span).await
    }

    /// Loop over `session` until it finishes or fails.
    pub async fn drive(&self, session: &mut Session) -> Result<AgentResponse> {
        info!("Starting new request ({} messages)", session.conversation.len());

        while session.turn < self.max_turns {
            if session.iterations >= self.max_iterations {
                warn!("Iteration ceiling reached at turn {}", session.turn);
                session.state = AgentState::Failed;
                return Err(SongVocabError::IterationLimitExceeded(self.max_iterations));
            }

            match self.step(session).await {
                Ok(StepOutcome::Finished(content)) => {
                    info!("LLM indicated task is complete after {} turn(s)", session.turn);
                    return Ok(AgentResponse {
                        content,
                        tool_calls: session.tool_calls.clone(),
                        turns: session.turn,
                        iterations: session.iterations,
                    });
                }
                Ok(StepOutcome::Advanced) | Ok(StepOutcome::Corrected) => {}
                Err(e) => {
                    session.state = AgentState::Failed;
                    return Err(e);
                }
            }
        }

        session.state = AgentState::Failed;
        Err(SongVocabError::MaxTurnsExceeded(self.max_turns))
    }

    /// One iteration: ask the model, then finish, correct, or dispatch.
    pub async fn step(&self, session: &mut Session) -> Result<StepOutcome> {
        session.iterations += 1;
        session.state = AgentState::AwaitingCompletion;
        info!(
            "[Turn {}/{}] iteration {}",
            session.turn + 1,
            self.max_turns,
            session.iterations
        );

        let reply = match self.llm.complete(session.conversation.messages()).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Model call failed in turn {}: {}", session.turn + 1, e);
                session.conversation.push(Message::system(format!(
                    "Error: {}. Please try a different approach.",
                    e
                )));
                return Ok(StepOutcome::Corrected);
            }
        };
        debug!("LLM response: {}", reply.content);

        if reply.content.contains(FINISHED_SENTINEL) {
            session.state = AgentState::Finished;
            return Ok(StepOutcome::Finished(reply.content));
        }

        session.state = AgentState::Parsing;
        let Some(call) = reply
            .tool_call
            .clone()
            .or_else(|| self.parser.parse(&reply.content))
        else {
            warn!("No tool call found in LLM response");
            session.conversation.push(Message::system(NO_ACTION_PROMPT));
            return Ok(StepOutcome::Corrected);
        };

        session.state = AgentState::Dispatching;
        match self.executor.execute(&call).await {
            Ok(result) => {
                let serialized = serde_json::to_string(&result)?;
                let assistant_text = if reply.content.trim().is_empty() {
                    call.to_string()
                } else {
                    reply.content
                };

                session.conversation.push(Message::assistant(assistant_text));
                session.conversation.push(Message::system(format!(
                    "Tool {} result: {}",
                    call.name, serialized
                )));
                session.tool_calls.push(ToolCallRecord {
                    name: call.name,
                    arguments: call.args,
                    result: serialized,
                    success: true,
                });
                session.turn += 1;
                Ok(StepOutcome::Advanced)
            }
            Err(e) => {
                warn!("Error in turn {}: {}", session.turn + 1, e);
                session.conversation.push(Message::system(format!(
                    "Error: {}. Please try a different approach.",
                    e
                )));
                session.tool_calls.push(ToolCallRecord {
                    name: call.name,
                    arguments: call.args,
                    result: e.to_string(),
                    success: false,
                });
                Ok(StepOutcome::Corrected)
            }
        }
    }
}

/// Response from an agent run.
#[derive(Debug, Clone, Serialize)]
pub struct AgentResponse {
    /// The final text, containing the sentinel.
    pub content: String,
    /// Record of all tool calls made during execution, failed ones included.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Productive turns used.
    pub turns: usize,
    /// Loop iterations (LLM calls) used.
    pub iterations: usize,
}
