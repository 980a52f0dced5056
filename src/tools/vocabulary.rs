//! Vocabulary extraction through the chat model.

use super::registry::Tool;
use super::required_arg;
use crate::agent::ToolArgs;
use crate::config::VOCABULARY_PROMPT;
use crate::error::{Result, SongVocabError};
use crate::llm::{ChatModel, Message};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, instrument};

/// One vocabulary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyItem {
    pub kanji: String,
    pub romaji: String,
    pub english: String,
    #[serde(default)]
    pub parts: Vec<VocabularyPart>,
}

/// A character (or run) of a word with its readings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyPart {
    pub kanji: String,
    #[serde(default)]
    pub romaji: Vec<String>,
}

/// Pull the JSON array out of a model reply that may wrap it in prose or fences.
pub fn parse_vocabulary(reply: &str) -> Result<Vec<VocabularyItem>> {
    let start = reply.find('[');
    let end = reply.rfind(']');
    match (start, end) {
        (Some(start), Some(end)) if start < end => Ok(serde_json::from_str(&reply[start..=end])?),
        _ => Err(SongVocabError::Llm(
            "Vocabulary response did not contain a JSON array".to_string(),
        )),
    }
}

/// `extract_vocabulary`: ask the model for structured vocabulary.
pub struct VocabularyTool {
    llm: Arc<dyn ChatModel>,
}

impl VocabularyTool {
    pub fn new(llm: Arc<dyn ChatModel>) -> Self {
        Self { llm }
    }

    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    pub async fn extract(&self, text: &str) -> Result<Vec<VocabularyItem>> {
        let messages = [Message::system(VOCABULARY_PROMPT), Message::user(text)];
        let reply = self.llm.complete(&messages).await?;
        let items = parse_vocabulary(&reply.content)?;
        info!("Extracted {} vocabulary items", items.len());
        Ok(items)
    }
}

#[async_trait]
impl Tool for VocabularyTool {
    fn name(&self) -> &str {
        "extract_vocabulary"
    }

    fn description(&self) -> &str {
        "Extract vocabulary items (kanji, romaji, english, parts) from Japanese text."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "text": { "type": "string", "description": "Japanese text, e.g. song lyrics" }
            },
            "required": ["text"]
        })
    }

    async fn invoke(&self, args: &ToolArgs) -> Result<Value> {
        let items = self.extract(required_arg(args, "text")?).await?;
        Ok(serde_json::to_value(items)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ModelReply;

    struct CannedModel(&'static str);

    #[async_trait]
    impl ChatModel for CannedModel {
        async fn complete(&self, messages: &[Message]) -> Result<ModelReply> {
            assert_eq!(messages.len(), 2);
            Ok(ModelReply::text(self.0))
        }
    }

    #[test]
    fn test_parse_vocabulary_in_code_fence() {
        let reply = "Here you go:\n```json\n[{\"kanji\": \"桜\", \"romaji\": \"sakura\", \"english\": \"cherry blossom\", \"parts\": [{\"kanji\": \"桜\", \"romaji\": [\"sa\", \"ku\", \"ra\"]}]}]\n```";
        let items = parse_vocabulary(reply).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].english, "cherry blossom");
        assert_eq!(items[0].parts[0].romaji, vec!["sa", "ku", "ra"]);
    }

    #[test]
    fn test_parse_vocabulary_without_array() {
        assert!(matches!(
            parse_vocabulary("I could not find any words."),
            Err(SongVocabError::Llm(_))
        ));
    }

    #[tokio::test]
    async fn test_invoke() {
        let tool = VocabularyTool::new(Arc::new(CannedModel(
            r#"[{"kanji": "空", "romaji": "sora", "english": "sky"}]"#,
        )));
        let value = tool
            .invoke(&ToolArgs::from([("text".to_string(), "空".to_string())]))
            .await
            .unwrap();
        assert_eq!(value[0]["romaji"], "sora");
        assert_eq!(value[0]["parts"], json!([]));
    }
}
