//! Historical pair builder.
//!
//! Scans the persisted message list for a thread and pairs each assistant
//! tool invocation with the tool result message that answers it, producing
//! the ordered sequence the side panel renders. Pure function of its input;
//! the controller decides whether the output replaces current state.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::extract::{resolve_outcome, resolve_tool_name};
use crate::models::{Message, MessageRole};
use crate::pairs::{ToolCall, ToolCallPair};

/// Output of one build pass over a thread's messages.
#[derive(Debug, Clone, Default)]
pub struct HistoricalPairs {
    /// Pairs in assistant-message order.
    pub pairs: Vec<ToolCallPair>,
    /// Kept pair's position keyed by the originating assistant message id.
    pub index_by_assistant_id: HashMap<String, usize>,
    /// Every assistant message id in original order, kept or not. Backs the
    /// positional fallback when a click misses the direct mapping.
    pub assistant_order: Vec<String>,
}

/// Build the ordered call/result pair sequence for a message list.
///
/// Pairing is 1:1 and first-match: the first tool message referencing an
/// assistant id wins, later duplicates are ignored. Assistant messages with
/// no matching tool result contribute nothing (a plain-text reply, or a call
/// still pending). Malformed structured content never fails the build; the
/// worst case is a pair named `unknown`.
pub fn build_pairs(messages: &[Message]) -> HistoricalPairs {
    let mut out = HistoricalPairs::default();

    for assistant in messages
        .iter()
        .filter(|m| m.role == MessageRole::Assistant && !m.id.is_empty())
    {
        out.assistant_order.push(assistant.id.clone());

        // First tool message answering this assistant id wins.
        let Some(tool) = messages
            .iter()
            .find(|m| m.role == MessageRole::Tool && m.answers() == Some(assistant.id.as_str()))
        else {
            continue;
        };

        let name = resolve_tool_name(&assistant.content, &tool.content);
        let is_success = resolve_outcome(&tool.content);

        // An "ask" with nothing to show has no display value.
        if name == "ask" && !has_attachments(&assistant.content, &tool.content) {
            debug!(assistant_id = %assistant.id, "dropping ask pair without attachments");
            continue;
        }

        let index = out.pairs.len();
        out.pairs.push(ToolCallPair::completed(
            ToolCall {
                name,
                content: assistant.content.clone(),
                timestamp: assistant.created_at,
            },
            tool.content.clone(),
            is_success,
            tool.created_at,
        ));
        out.index_by_assistant_id.insert(assistant.id.clone(), index);
    }

    debug!(
        pairs = out.pairs.len(),
        assistants = out.assistant_order.len(),
        "built historical tool call pairs"
    );
    out
}

/// Whether either side of a pair carries a non-empty `attachments` array.
///
/// Checked at the JSON root, under a `content` wrapper, and under
/// `arguments` — the shapes the backend has used for ask payloads.
fn has_attachments(assistant_content: &str, tool_content: &str) -> bool {
    [assistant_content, tool_content]
        .iter()
        .any(|content| content_has_attachments(content))
}

fn content_has_attachments(content: &str) -> bool {
    let Ok(value) = serde_json::from_str::<Value>(content) else {
        return false;
    };
    if attachments_at(&value) {
        return true;
    }
    // Ask arguments live on the first tool_calls entry when the assistant
    // content is a structured call list.
    if let Some(args) = value
        .get("tool_calls")
        .and_then(|v| v.as_array())
        .and_then(|a| a.first())
        .and_then(|c| c.get("arguments"))
    {
        if attachments_at(args) {
            return true;
        }
    }
    for key in ["content", "arguments"] {
        match value.get(key) {
            Some(nested @ Value::Object(_)) => {
                if attachments_at(nested) {
                    return true;
                }
            }
            Some(Value::String(inner)) => {
                if let Ok(nested) = serde_json::from_str::<Value>(inner) {
                    if attachments_at(&nested) {
                        return true;
                    }
                }
            }
            _ => {}
        }
    }
    false
}

fn attachments_at(value: &Value) -> bool {
    value
        .get("attachments")
        .and_then(|v| v.as_array())
        .is_some_and(|a| !a.is_empty())
}
