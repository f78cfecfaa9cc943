//! Assistant Response Formatting
//!
//! The goal assistant answers in loosely structured free text. These
//! functions turn that text into a flat list of [`Block`]s so both the
//! terminal and the browser can render it without re-parsing.
//!
//! Three strategies, one per assistant action:
//!
//! - **Review**: the answer is plain prose
//! - **Advice**: blank-line separated blocks; `*` blocks become lists,
//!   greetings and assistant sign-offs are emphasized
//! - **Scenario**: `**bold**` segments become headings, the text between
//!   them is split into paragraphs and bullet lists

use std::sync::OnceLock;

use regex::Regex;

use crate::models::{AgentResponse, AssistantAction};

/// Blocks starting with this token are greetings
pub const GREETING_PREFIX: &str = "Hi";
/// Name the assistant signs its advice with
pub const ASSISTANT_NAME: &str = "Clarence";

const PARAGRAPH_BREAK: &str = "\n\n";

/// One renderable piece of an assistant response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading(String),
    Prose(String),
    /// Prose rendered with emphasis
    Emphasis(String),
    List(Vec<String>),
}

fn bold_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid bold pattern"))
}

/// A `*` followed by whitespace, or a `*` opening a line
fn bullet_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?m)^[ \t]*\*\s*|\*\s+").expect("valid bullet pattern"))
}

/// Format the text of a response with the strategy of its action
pub fn format_response(response: &AgentResponse) -> Vec<Block> {
    format_text(response.action(), response.text())
}

/// Format free text with the strategy of `action`
pub fn format_text(action: AssistantAction, text: &str) -> Vec<Block> {
    match action {
        AssistantAction::Review => format_review(text),
        AssistantAction::Advice => format_advice(text),
        AssistantAction::Scenario => format_scenario(text),
    }
}

/// Review answers are shown as-is
pub fn format_review(text: &str) -> Vec<Block> {
    if text.is_empty() {
        return Vec::new();
    }
    vec![Block::Prose(text.to_string())]
}

/// Split advice into blank-line separated blocks
///
/// Block text is kept verbatim; only list items are trimmed.
pub fn format_advice(text: &str) -> Vec<Block> {
    text.split(PARAGRAPH_BREAK)
        .map(|section| {
            if section.trim().starts_with('*') {
                let items = section
                    .split('*')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect();
                Block::List(items)
            } else if section.starts_with(GREETING_PREFIX) || section.contains(ASSISTANT_NAME) {
                Block::Emphasis(section.to_string())
            } else {
                Block::Prose(section.to_string())
            }
        })
        .collect()
}

/// Split a scenario analysis into headings, paragraphs and lists
pub fn format_scenario(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();

    for (index, segment) in split_bold(text).into_iter().enumerate() {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }

        if index % 2 == 1 {
            blocks.push(Block::Heading(segment.to_string()));
            continue;
        }

        for paragraph in segment.split(PARAGRAPH_BREAK) {
            if paragraph.trim().is_empty() {
                continue;
            }

            if paragraph.contains('*') {
                let items: Vec<String> = bullet_pattern()
                    .split(paragraph)
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect();
                if !items.is_empty() {
                    blocks.push(Block::List(items));
                }
            } else {
                blocks.push(Block::Prose(paragraph.trim().to_string()));
            }
        }
    }

    blocks
}

/// Split around `**...**`, keeping the captured text at odd indices
fn split_bold(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut last = 0;

    for captures in bold_pattern().captures_iter(text) {
        let (Some(whole), Some(inner)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        segments.push(&text[last..whole.start()]);
        segments.push(inner.as_str());
        last = whole.end();
    }
    segments.push(&text[last..]);

    segments
}
