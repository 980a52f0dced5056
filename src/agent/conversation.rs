//! Conversation history and per-session loop state.

use super::types::ToolCallRecord;
use crate::llm::Message;
use uuid::Uuid;

/// Append-only message history.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Seed a conversation with the system prompt and the user's request.
    pub fn new(system_prompt: &str, user_message: &str) -> Self {
        Self {
            messages: vec![Message::system(system_prompt), Message::user(user_message)],
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Where the controller is within one loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    AwaitingCompletion,
    Parsing,
    Dispatching,
    Finished,
    Failed,
}

impl AgentState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, AgentState::Finished | AgentState::Failed)
    }
}

/// State of one user request.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub conversation: Conversation,
    /// Productive turns: successful tool dispatches.
    pub turn: usize,
    /// Every pass through the loop, productive or not.
    pub iterations: usize,
    pub state: AgentState,
    pub tool_calls: Vec<ToolCallRecord>,
}

impl Session {
    pub fn new(system_prompt: &str, user_message: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            conversation: Conversation::new(system_prompt, user_message),
            turn: 0,
            iterations: 0,
            state: AgentState::AwaitingCompletion,
            tool_calls: Vec::new(),
        }
    }
}
