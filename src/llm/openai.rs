//! OpenAI-compatible chat backend.

use super::{ChatModel, Message, ModelReply, Role};
use crate::agent::ToolCall;
use crate::config::LlmSettings;
use crate::error::{Result, SongVocabError};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionTool, CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use futures::StreamExt;
use tracing::{debug, instrument, trace, warn};

/// Chat model served over the OpenAI chat-completions protocol.
pub struct OpenAIChat {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    stream: bool,
    tools: Vec<ChatCompletionTool>,
}

impl OpenAIChat {
    /// Create a backend from the `[llm]` settings.
    pub fn new(settings: &LlmSettings) -> Result<Self> {
        Ok(Self {
            client: create_client(settings)?,
            model: settings.model.clone(),
            stream: settings.stream,
            tools: Vec::new(),
        })
    }

    /// Override the model identifier.
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Enable or disable streamed completions.
    pub fn with_streaming(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    /// Advertise native function definitions. Disables streaming for those requests.
    pub fn with_tools(mut self, tools: Vec<ChatCompletionTool>) -> Self {
        self.tools = tools;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, messages: &[Message], stream: bool) -> Result<CreateChatCompletionRequest> {
        let messages = messages
            .iter()
            .map(to_request_message)
            .collect::<Result<Vec<_>>>()?;

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&self.model).messages(messages);
        if stream {
            args.stream(true);
        }
        if !self.tools.is_empty() {
            args.tools(self.tools.clone());
        }

        args.build().map_err(|e| SongVocabError::Llm(e.to_string()))
    }

    async fn complete_streaming(&self, messages: &[Message]) -> Result<ModelReply> {
        let request = self.build_request(messages, true)?;
        let mut stream = self
            .client
            .chat()
            .create_stream(request)
            .await
            .map_err(|e| SongVocabError::Llm(format!("Chat stream error: {}", e)))?;

        let mut content = String::new();
        while let Some(chunk) = stream.next().await {
            let chunk =
                chunk.map_err(|e| SongVocabError::Llm(format!("Chat stream error: {}", e)))?;
            for choice in chunk.choices {
                if let Some(delta) = choice.delta.content {
                    trace!("Token: {}", delta);
                    content.push_str(&delta);
                }
            }
        }

        Ok(ModelReply::text(content))
    }

    async fn complete_once(&self, messages: &[Message]) -> Result<ModelReply> {
        let request = self.build_request(messages, false)?;
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| SongVocabError::Llm(format!("Chat API error: {}", e)))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| SongVocabError::Llm("No response from model".to_string()))?;

        let mut tool_calls = choice.message.tool_calls.unwrap_or_default().into_iter();
        let tool_call = tool_calls
            .next()
            .map(|call| ToolCall::from_json_arguments(&call.function.name, &call.function.arguments));
        if tool_calls.next().is_some() {
            warn!("Model returned several tool calls; only the first is executed");
        }

        Ok(ModelReply {
            content: choice.message.content.unwrap_or_default(),
            tool_call,
        })
    }
}

#[async_trait]
impl ChatModel for OpenAIChat {
    #[instrument(skip(self, messages), fields(model = %self.model, messages = messages.len()))]
    async fn complete(&self, messages: &[Message]) -> Result<ModelReply> {
        let reply = if self.stream && self.tools.is_empty() {
            self.complete_streaming(messages).await?
        } else {
            self.complete_once(messages).await?
        };
        debug!("Model reply: {} chars", reply.content.chars().count());
        Ok(reply)
    }
}

fn to_request_message(message: &Message) -> Result<ChatCompletionRequestMessage> {
    let content = message.content.clone();
    let built: ChatCompletionRequestMessage = match message.role {
        Role::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()
            .map_err(|e| SongVocabError::Llm(e.to_string()))?
            .into(),
        Role::User => ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()
            .map_err(|e| SongVocabError::Llm(e.to_string()))?
            .into(),
        Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(content)
            .build()
            .map_err(|e| SongVocabError::Llm(e.to_string()))?
            .into(),
    };
    Ok(built)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streaming_request_has_no_tools() {
        let chat = OpenAIChat::new(&LlmSettings::default()).unwrap();
        let request = chat
            .build_request(&[Message::system("s"), Message::user("u")], true)
            .unwrap();
        assert_eq!(request.model, "llama3.2:3b");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.stream, Some(true));
        assert!(request.tools.is_none());
    }

    #[test]
    fn test_with_model_override() {
        let chat = OpenAIChat::new(&LlmSettings::default())
            .unwrap()
            .with_model("qwen2.5:7b")
            .with_streaming(false);
        assert_eq!(chat.model(), "qwen2.5:7b");
    }
}
