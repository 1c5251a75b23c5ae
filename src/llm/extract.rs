//! Recover a JSON object from free-form model output
//!
//! Models are told to answer with a bare JSON object, but in practice the
//! object arrives wrapped in code fences or surrounded by prose. Recovery
//! tries progressively looser strategies and stops at the first one that
//! yields an object.

use crate::command::decision::ParsedCommand;
use serde_json::Value;

/// Extract the first JSON object from a model response
///
/// Order of attempts:
/// 1. the whole (trimmed) text
/// 2. the text with code fences and a language tag removed
/// 3. the span from the first `{` to the last `}` of the cleaned text
///
/// Returns `None` when no attempt produces a JSON object.
pub fn extract_json(raw: &str) -> Option<ParsedCommand> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(command) = parse_object(trimmed) {
        return Some(command);
    }

    let cleaned = strip_code_fences(trimmed);
    if let Some(command) = parse_object(cleaned) {
        return Some(command);
    }

    let start = cleaned.find('{')?;
    let end = cleaned.rfind('}')?;
    if end <= start {
        return None;
    }
    parse_object(&cleaned[start..=end])
}

/// Remove a surrounding triple-backtick fence and its language tag
///
/// Text that does not start with a fence is returned trimmed but otherwise
/// unchanged.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.trim_start_matches('`');

    let body = match rest.split_once('\n') {
        Some((first, body)) if is_language_tag(first) => body,
        _ => rest,
    };

    body.trim_end().trim_end_matches('`').trim()
}

fn is_language_tag(line: &str) -> bool {
    line.trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '.'))
}

fn parse_object(text: &str) -> Option<ParsedCommand> {
    serde_json::from_str::<Value>(text)
        .ok()
        .and_then(ParsedCommand::from_value)
}
