//! Textual tool-call parser.
//!
//! Recognizes `Tool: name(arg="value", ...)` anywhere in the model output. The
//! matcher is deliberately permissive: argument pairs are picked out one at a
//! time, and a malformed argument list produces a call with whatever pairs
//! could be matched (possibly none).

use super::types::{ToolArgs, ToolCall};
use regex::Regex;

const CALL_PATTERN: &str = r"Tool:\s*([A-Za-z0-9_]+)\((.*?)\)";
const ARG_PATTERN: &str = r#"([A-Za-z0-9_]+)="([^"]*?)""#;

/// Extracts tool calls from free-form model text.
#[derive(Debug, Clone)]
pub struct ActionParser {
    call: Regex,
    arg: Regex,
}

impl ActionParser {
    pub fn new() -> Self {
        Self {
            call: Regex::new(CALL_PATTERN).expect("tool call pattern is valid"),
            arg: Regex::new(ARG_PATTERN).expect("argument pattern is valid"),
        }
    }

    /// Parse the first tool call in `text`, if any.
    pub fn parse(&self, text: &str) -> Option<ToolCall> {
        let captures = self.call.captures(text)?;
        let name = captures.get(1)?.as_str();
        let args_str = captures.get(2).map(|m| m.as_str()).unwrap_or_default();

        let args: ToolArgs = self
            .arg
            .captures_iter(args_str)
            .map(|c| (c[1].to_string(), c[2].to_string()))
            .collect();

        Some(ToolCall::new(name, args))
    }
}

impl Default for ActionParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unicode_arguments() {
        let call = ActionParser::new()
            .parse(r#"Tool: search_web_ddg(query="東京 天気", max_results="3")"#)
            .unwrap();
        assert_eq!(call.name, "search_web_ddg");
        assert_eq!(call.args.len(), 2);
        assert_eq!(call.args["query"], "東京 天気");
        assert_eq!(call.args["max_results"], "3");
    }

    #[test]
    fn test_parse_no_tool() {
        assert!(ActionParser::new().parse("no tool mentioned here").is_none());
    }

    #[test]
    fn test_parse_embedded_in_prose() {
        let text = "I should look this up first.\nTool: get_page_content(url=\"https://example.com/a\")\nThen I'll read it.";
        let call = ActionParser::new().parse(text).unwrap();
        assert_eq!(call.name, "get_page_content");
        assert_eq!(call.args["url"], "https://example.com/a");
    }

    #[test]
    fn test_parse_whitespace_after_colon_and_arbitrary_separators() {
        let call = ActionParser::new()
            .parse(r#"Tool:generate_song_id(title="さくら" ; artist="森山直太朗")"#)
            .unwrap();
        assert_eq!(call.name, "generate_song_id");
        assert_eq!(call.args["title"], "さくら");
        assert_eq!(call.args["artist"], "森山直太朗");
    }

    #[test]
    fn test_parse_unterminated_quote_yields_empty_args() {
        let call = ActionParser::new()
            .parse(r#"Tool: search_web_ddg(query="unterminated)"#)
            .unwrap();
        assert_eq!(call.name, "search_web_ddg");
        assert!(call.args.is_empty());
    }

    #[test]
    fn test_parse_no_arguments() {
        let call = ActionParser::new().parse("Tool: list_tools()").unwrap();
        assert_eq!(call.name, "list_tools");
        assert!(call.args.is_empty());
    }

    #[test]
    fn test_parse_takes_first_call_only() {
        let call = ActionParser::new()
            .parse(r#"Tool: a(x="1") Tool: b(y="2")"#)
            .unwrap();
        assert_eq!(call.name, "a");
        assert_eq!(call.args["x"], "1");
    }

    #[test]
    fn test_parse_stops_at_first_closing_paren() {
        let call = ActionParser::new()
            .parse(r#"Tool: search_web_ddg(query="a (b) c")"#)
            .unwrap();
        // The lazy span ends at the first ')', cutting the value short.
        assert!(call.args.is_empty());
    }

    #[test]
    fn test_parse_duplicate_key_last_wins() {
        let call = ActionParser::new()
            .parse(r#"Tool: t(q="first", q="second")"#)
            .unwrap();
        assert_eq!(call.args["q"], "second");
    }
}
