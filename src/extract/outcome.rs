//! Tool result success/failure resolution strategies.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Matches the legacy `ToolResult(success=...)` marker in raw result text.
static LEGACY_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)ToolResult\s*\(\s*success\s*=\s*(true|false)").expect("valid marker regex")
});

/// A single way success/failure may be encoded in a tool result payload.
///
/// Attempted in the order of [`OUTCOME_STRATEGIES`], first `Some` wins;
/// when every strategy misses the result is treated as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStrategy {
    /// A `success` boolean on the JSON payload (root or under `content`).
    StructuredFlag,
    /// The legacy `ToolResult(success=True/False)` raw-text marker.
    LegacyMarker,
    /// Failure substrings (`failed`, `error`, `failure`) in the raw text.
    TextHeuristic,
}

/// Priority order for outcome resolution.
pub const OUTCOME_STRATEGIES: [OutcomeStrategy; 3] = [
    OutcomeStrategy::StructuredFlag,
    OutcomeStrategy::LegacyMarker,
    OutcomeStrategy::TextHeuristic,
];

impl OutcomeStrategy {
    /// Attempt to extract a success flag from raw result content.
    pub fn apply(&self, content: &str) -> Option<bool> {
        match self {
            OutcomeStrategy::StructuredFlag => structured_flag(content),
            OutcomeStrategy::LegacyMarker => legacy_marker(content),
            OutcomeStrategy::TextHeuristic => text_heuristic(content),
        }
    }
}

/// Resolve the success flag for a tool result, defaulting to success when
/// no signal is found.
pub fn resolve_outcome(content: &str) -> bool {
    for strategy in OUTCOME_STRATEGIES {
        if let Some(success) = strategy.apply(content) {
            return success;
        }
    }
    true
}

fn success_field(value: &Value) -> Option<bool> {
    value.get("success").and_then(|v| v.as_bool())
}

fn structured_flag(content: &str) -> Option<bool> {
    let value: Value = serde_json::from_str(content).ok()?;
    if let Some(flag) = success_field(&value) {
        return Some(flag);
    }
    match value.get("content") {
        Some(Value::Object(_)) => success_field(value.get("content")?),
        Some(Value::String(inner)) => {
            let inner: Value = serde_json::from_str(inner).ok()?;
            success_field(&inner)
        }
        _ => None,
    }
}

fn legacy_marker(content: &str) -> Option<bool> {
    LEGACY_MARKER
        .captures(content)
        .map(|caps| caps[1].eq_ignore_ascii_case("true"))
}

fn text_heuristic(content: &str) -> Option<bool> {
    let lower = content.to_lowercase();
    if lower.contains("failed") || lower.contains("error") || lower.contains("failure") {
        Some(false)
    } else {
        None
    }
}
