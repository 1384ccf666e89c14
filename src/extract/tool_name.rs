//! Tool name resolution strategies.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Matches the first XML-style opening tag in raw assistant content.
static OPENING_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<([A-Za-z][A-Za-z0-9_-]*)").expect("valid tag regex"));

/// A single way a tool name may be encoded in message content.
///
/// Strategies are attempted in the order of [`NAME_STRATEGIES`]; the first
/// one returning `Some` wins. Malformed payloads never fail a strategy
/// loudly, they simply fall through to the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameStrategy {
    /// `tool_name` / `xml_tag_name` on the tool message's JSON content,
    /// possibly nested under a `content` wrapper (itself an object or a
    /// JSON-encoded string).
    StructuredToolContent,
    /// First entry of a `tool_calls` array on the assistant message's JSON
    /// content (`name`, `function.name` or `xml_tag_name`).
    AssistantToolCallList,
    /// First XML-style opening tag embedded in the assistant raw content.
    EmbeddedTag,
}

/// Priority order for name resolution.
pub const NAME_STRATEGIES: [NameStrategy; 3] = [
    NameStrategy::StructuredToolContent,
    NameStrategy::AssistantToolCallList,
    NameStrategy::EmbeddedTag,
];

impl NameStrategy {
    /// Attempt to extract a raw (un-normalized) tool name.
    pub fn apply(&self, assistant_content: &str, tool_content: &str) -> Option<String> {
        match self {
            NameStrategy::StructuredToolContent => structured_tool_content(tool_content),
            NameStrategy::AssistantToolCallList => assistant_tool_call_list(assistant_content),
            NameStrategy::EmbeddedTag => embedded_tag(assistant_content),
        }
    }
}

/// Resolve a canonical tool name for a matched assistant/tool message pair.
///
/// Falls back to `"unknown"` when every strategy misses.
pub fn resolve_tool_name(assistant_content: &str, tool_content: &str) -> String {
    for strategy in NAME_STRATEGIES {
        if let Some(raw) = strategy.apply(assistant_content, tool_content) {
            let name = normalize_tool_name(&raw);
            if !name.is_empty() {
                return name;
            }
        }
    }
    "unknown".to_string()
}

/// Normalize a raw tool name to canonical lowercase-hyphenated form.
///
/// Underscores and whitespace become hyphens; runs collapse to one hyphen;
/// leading/trailing hyphens are trimmed.
pub fn normalize_tool_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last_hyphen = true;
    for ch in raw.trim().chars() {
        if ch == '_' || ch == '-' || ch.is_whitespace() {
            if !last_hyphen {
                out.push('-');
                last_hyphen = true;
            }
        } else {
            out.extend(ch.to_lowercase());
            last_hyphen = false;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

/// Look for `tool_name` / `xml_tag_name` directly on a JSON object.
fn name_fields(value: &Value) -> Option<String> {
    value
        .get("tool_name")
        .or_else(|| value.get("xml_tag_name"))
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn structured_tool_content(tool_content: &str) -> Option<String> {
    let value: Value = serde_json::from_str(tool_content).ok()?;
    if let Some(name) = name_fields(&value) {
        return Some(name);
    }
    // The backend sometimes wraps the payload: {"content": {...}} or
    // {"content": "{\"tool_name\": ...}"}.
    match value.get("content") {
        Some(Value::Object(_)) => name_fields(value.get("content")?),
        Some(Value::String(inner)) => {
            let inner: Value = serde_json::from_str(inner).ok()?;
            name_fields(&inner)
        }
        _ => None,
    }
}

fn assistant_tool_call_list(assistant_content: &str) -> Option<String> {
    let value: Value = serde_json::from_str(assistant_content).ok()?;
    let first = value.get("tool_calls")?.as_array()?.first()?;
    first
        .get("name")
        .or_else(|| first.get("function").and_then(|f| f.get("name")))
        .or_else(|| first.get("xml_tag_name"))
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn embedded_tag(assistant_content: &str) -> Option<String> {
    OPENING_TAG
        .captures(assistant_content)
        .map(|caps| caps[1].to_string())
}
