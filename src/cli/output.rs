//! Terminal output for the CLI.

use console::{style, StyledObject};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const SPINNER_TICK: Duration = Duration::from_millis(100);

/// Styled terminal output.
pub struct Output;

impl Output {
    pub fn info(msg: &str) {
        println!("{} {}", marker().cyan(), msg);
    }

    pub fn success(msg: &str) {
        println!("{} {}", marker().green(), msg);
    }

    /// Warnings and errors go to stderr.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", marker().yellow(), msg);
    }

    pub fn error(msg: &str) {
        eprintln!("{} {}", marker().red(), msg);
    }

    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// One line per tool call in the session transcript.
    pub fn tool_call(call: &str, success: bool) {
        let status = if success {
            style("ok ").green()
        } else {
            style("err").red()
        };
        println!("  {} {}", status, content_preview(call, 100));
    }

    pub fn search_result(index: usize, title: &str, url: &str, snippet: &str) {
        println!("\n{} {}", style(format!("{}.", index)).green(), style(title).bold());
        println!("   {}", style(url).dim());
        if !snippet.is_empty() {
            println!("   {}", content_preview(snippet, 200));
        }
    }

    /// Closing line of an agent run.
    pub fn session_summary(turns: usize, iterations: usize) {
        let corrections = iterations.saturating_sub(turns + 1);
        let mut line = format!("Completed in {} turn(s), {} model call(s)", turns, iterations);
        if corrections > 0 {
            line.push_str(&format!(", {} corrected", corrections));
        }
        Output::info(&line);
    }

    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        let spinner_style = ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        pb.set_style(spinner_style);
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(SPINNER_TICK);
        pb
    }
}

fn marker() -> StyledObject<&'static str> {
    style(">>").bold()
}

/// Single-line preview, cut on a character boundary.
fn content_preview(content: &str, max_chars: usize) -> String {
    let flat = content.replace('\n', " ");
    match flat.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &flat[..cut]),
        None => flat,
    }
}
