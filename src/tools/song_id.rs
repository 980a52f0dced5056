//! Stable song identifiers.

use super::registry::BlockingTool;
use super::required_arg;
use crate::error::{Result, SongVocabError};
use serde_json::json;

/// Lowercase slug of `artist` and `title`; non-alphanumeric runs become one `-`.
///
/// Non-ASCII letters are kept so Japanese titles still produce an id.
pub fn generate_song_id(artist: Option<&str>, title: &str) -> Result<String> {
    let source = match artist.map(str::trim).filter(|a| !a.is_empty()) {
        Some(artist) => format!("{} {}", artist, title),
        None => title.to_string(),
    };

    let mut slug = String::with_capacity(source.len());
    for c in source.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-').to_string();

    if slug.is_empty() {
        return Err(SongVocabError::InvalidArgument {
            name: "title".to_string(),
            reason: "title has no letters or digits".to_string(),
        });
    }
    Ok(slug)
}

/// `generate_song_id` as a blocking tool.
pub fn song_id_tool() -> BlockingTool {
    BlockingTool::new(
        "generate_song_id",
        "Generate a stable identifier for a song from its artist and title.",
        |args| {
            let title = required_arg(&args, "title")?;
            let artist = args.get("artist").map(String::as_str);
            Ok(json!({ "song_id": generate_song_id(artist, title)? }))
        },
    )
    .with_parameters(json!({
        "type": "object",
        "properties": {
            "artist": { "type": "string", "description": "Artist name (optional)" },
            "title": { "type": "string", "description": "Song title" }
        },
        "required": ["title"]
    }))
}
