//! Persist lyrics and vocabulary for a song.

use super::registry::BlockingTool;
use super::required_arg;
use crate::error::{Result, SongVocabError};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing::info;

/// Output locations, fixed when the tool is built.
#[derive(Debug, Clone)]
pub struct SaveResultsConfig {
    pub lyrics_dir: PathBuf,
    pub vocabulary_dir: PathBuf,
}

/// Paths written by [`save_results`].
#[derive(Debug, Clone, Serialize)]
pub struct SavedFiles {
    pub lyrics_file: PathBuf,
    pub vocabulary_file: PathBuf,
}

/// Write `<lyrics_dir>/<song_id>.txt` and `<vocabulary_dir>/<song_id>.json`.
///
/// `vocabulary` is stored as JSON when it parses, otherwise as a JSON string.
pub fn save_results(
    config: &SaveResultsConfig,
    song_id: &str,
    lyrics: &str,
    vocabulary: &str,
) -> Result<SavedFiles> {
    validate_song_id(song_id)?;

    std::fs::create_dir_all(&config.lyrics_dir)?;
    std::fs::create_dir_all(&config.vocabulary_dir)?;

    let lyrics_file = config.lyrics_dir.join(format!("{}.txt", song_id));
    std::fs::write(&lyrics_file, lyrics)?;

    let vocabulary_value = serde_json::from_str::<Value>(vocabulary)
        .unwrap_or_else(|_| Value::String(vocabulary.to_string()));
    let document = json!({
        "song_id": song_id,
        "saved_at": Utc::now().to_rfc3339(),
        "vocabulary": vocabulary_value,
    });
    let vocabulary_file = config.vocabulary_dir.join(format!("{}.json", song_id));
    std::fs::write(&vocabulary_file, serde_json::to_string_pretty(&document)?)?;

    info!(
        "Saved results for {} to {} and {}",
        song_id,
        lyrics_file.display(),
        vocabulary_file.display()
    );
    Ok(SavedFiles {
        lyrics_file,
        vocabulary_file,
    })
}

/// Ids become file names, so no separators or traversal.
fn validate_song_id(song_id: &str) -> Result<()> {
    let invalid = song_id.is_empty()
        || song_id.contains(&['/', '\\'][..])
        || song_id.starts_with('.')
        || song_id.contains("..");
    if invalid {
        return Err(SongVocabError::InvalidArgument {
            name: "song_id".to_string(),
            reason: format!("'{}' cannot be used as a file name", song_id),
        });
    }
    Ok(())
}

/// `save_results` as a blocking tool bound to `config`.
pub fn save_results_tool(config: SaveResultsConfig) -> BlockingTool {
    BlockingTool::new(
        "save_results",
        "Save the lyrics and vocabulary for a song.",
        move |args| {
            let saved = save_results(
                &config,
                required_arg(&args, "song_id")?,
                required_arg(&args, "lyrics")?,
                args.get("vocabulary").map(String::as_str).unwrap_or("[]"),
            )?;
            Ok(serde_json::to_value(saved)?)
        },
    )
    .with_parameters(json!({
        "type": "object",
        "properties": {
            "song_id": { "type": "string", "description": "Identifier from generate_song_id" },
            "lyrics": { "type": "string", "description": "Full lyrics text" },
            "vocabulary": { "type": "string", "description": "Vocabulary as a JSON array" }
        },
        "required": ["song_id", "lyrics"]
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::ToolArgs;
    use crate::tools::Tool;

    fn config(root: &std::path::Path) -> SaveResultsConfig {
        SaveResultsConfig {
            lyrics_dir: root.join("lyrics"),
            vocabulary_dir: root.join("vocabulary"),
        }
    }

    #[test]
    fn test_save_results_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let saved = save_results(
            &config(dir.path()),
            "sakura",
            "さくら さくら",
            r#"[{"kanji": "桜"}]"#,
        )
        .unwrap();

        assert_eq!(std::fs::read_to_string(&saved.lyrics_file).unwrap(), "さくら さくら");
        let doc: Value =
            serde_json::from_str(&std::fs::read_to_string(&saved.vocabulary_file).unwrap()).unwrap();
        assert_eq!(doc["song_id"], "sakura");
        assert_eq!(doc["vocabulary"][0]["kanji"], "桜");
    }

    #[test]
    fn test_save_results_keeps_unparseable_vocabulary_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let saved = save_results(&config(dir.path()), "s", "l", "not json").unwrap();
        let doc: Value =
            serde_json::from_str(&std::fs::read_to_string(&saved.vocabulary_file).unwrap()).unwrap();
        assert_eq!(doc["vocabulary"], "not json");
    }

    #[test]
    fn test_rejects_path_like_song_id() {
        let dir = tempfile::tempdir().unwrap();
        for id in ["../escape", "a/b", "", ".hidden"] {
            assert!(save_results(&config(dir.path()), id, "l", "[]").is_err(), "{}", id);
        }
    }

    #[tokio::test]
    async fn test_tool_uses_bound_directories() {
        let dir = tempfile::tempdir().unwrap();
        let tool = save_results_tool(config(dir.path()));
        let args = ToolArgs::from([
            ("song_id".to_string(), "lemon".to_string()),
            ("lyrics".to_string(), "夢ならばどれほどよかったでしょう".to_string()),
        ]);

        tool.invoke(&args).await.unwrap();

        assert!(dir.path().join("lyrics").join("lemon.txt").exists());
        assert!(dir.path().join("vocabulary").join("lemon.json").exists());
    }
}
