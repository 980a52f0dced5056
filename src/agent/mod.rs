//! Tool-calling agent.
//!
//! The model is asked for its next action, the reply is parsed into a tool
//! call, the tool runs, and its result is fed back into the conversation until
//! the model reports `FINISHED` or a loop bound is hit.

mod controller;
mod conversation;
mod executor;
mod parser;
mod types;

pub use controller::{
    AgentResponse, ConversationController, StepOutcome, FINISHED_SENTINEL, NO_ACTION_PROMPT,
};
pub use conversation::{AgentState, Conversation, Session};
pub use executor::ToolExecutor;
pub use parser::ActionParser;
pub use types::{ToolArgs, ToolCall, ToolCallRecord};
