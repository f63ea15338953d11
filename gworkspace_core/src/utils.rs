use rmcp::model::{CallToolResult, Content, RawContent};
use serde_json::Value;

use crate::error::WorkspaceError;
use crate::ToolArgs;

/// Successful tool result carrying a single text block.
pub fn text_result(text: impl Into<String>) -> CallToolResult {
    CallToolResult {
        content: vec![Content::text(text.into())],
        structured_content: None,
        is_error: Some(false),
        meta: None,
    }
}

/// Failed tool result: `Error: <message>` with `isError: true`.
pub fn error_result(message: impl std::fmt::Display) -> CallToolResult {
    CallToolResult {
        content: vec![Content::text(format!("Error: {}", message))],
        structured_content: None,
        is_error: Some(true),
        meta: None,
    }
}

/// Concatenated text of every text block in a result.
pub fn result_text(result: &CallToolResult) -> String {
    result
        .content
        .iter()
        .filter_map(|c| match &c.raw {
            RawContent::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn is_error(result: &CallToolResult) -> bool {
    result.is_error.unwrap_or(false)
}

/// String argument, or `None` when absent or not a string.
pub fn string_arg<'a>(args: &'a ToolArgs, key: &str) -> Option<&'a str> {
    args.get(key).and_then(Value::as_str)
}

pub fn string_arg_or<'a>(args: &'a ToolArgs, key: &str, default: &'a str) -> &'a str {
    string_arg(args, key).unwrap_or(default)
}

/// Non-empty string argument or an `InvalidParams` naming the key.
pub fn required_string<'a>(args: &'a ToolArgs, key: &str) -> Result<&'a str, WorkspaceError> {
    match string_arg(args, key) {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(WorkspaceError::InvalidParams(format!(
            "{} is required",
            key
        ))),
    }
}

/// Page size from a numeric argument. Non-numbers and values below 1 fall
/// back to `default`; fractions are truncated.
pub fn page_size_arg(args: &ToolArgs, key: &str, default: u32) -> u32 {
    match args.get(key).and_then(Value::as_f64) {
        Some(n) if n >= 1.0 && n <= u32::MAX as f64 => n as u32,
        _ => default,
    }
}

/// Drive reports sizes as decimal strings of bytes.
pub fn format_kb(size: Option<&str>) -> String {
    match size.and_then(|s| s.parse::<u64>().ok()) {
        Some(bytes) => format!("{} KB", (bytes as f64 / 1024.0).round() as u64),
        None => "N/A".to_string(),
    }
}

/// First `max_chars` characters, with `...` appended when cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Drive query literal: backslash-escape single quotes.
pub fn escape_query_literal(value: &str) -> String {
    value.replace('\'', "\\'")
}
