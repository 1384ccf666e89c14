//! Tool call / tool result pair types.
//!
//! A `ToolCallPair` is the derived, ephemeral unit the side panel renders:
//! one tool invocation and its outcome. While a call is streaming its result
//! is `ToolResult::Streaming`; the sequence invariant (at most one streaming
//! entry) is enforced by the controller's explicit streaming handle rather
//! than by scanning for the sentinel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The invocation half of a pair: the assistant's tool call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    /// Canonical lowercase-hyphenated tool name.
    pub name: String,
    /// Display content (raw or tag-shaped arguments).
    pub content: String,
    /// When the invoking assistant message was created.
    pub timestamp: DateTime<Utc>,
}

/// Outcome of a tool call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ToolResult {
    /// The call is still streaming; no terminal message has arrived.
    Streaming,
    /// The call finished with a persisted result message.
    Completed {
        content: String,
        is_success: bool,
        timestamp: DateTime<Utc>,
    },
}

impl ToolResult {
    /// Whether this result is still the streaming sentinel.
    pub fn is_streaming(&self) -> bool {
        matches!(self, ToolResult::Streaming)
    }

    /// Success flag for completed results, `None` while streaming.
    pub fn success(&self) -> Option<bool> {
        match self {
            ToolResult::Streaming => None,
            ToolResult::Completed { is_success, .. } => Some(*is_success),
        }
    }
}

/// One tool invocation paired with its outcome.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCallPair {
    pub call: ToolCall,
    pub result: ToolResult,
}

impl ToolCallPair {
    /// Create an in-progress pair for a call that just began streaming.
    pub fn streaming(name: String, content: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            call: ToolCall {
                name,
                content,
                timestamp,
            },
            result: ToolResult::Streaming,
        }
    }

    /// Create a completed pair from a matched call/result.
    pub fn completed(call: ToolCall, content: String, is_success: bool, timestamp: DateTime<Utc>) -> Self {
        Self {
            call,
            result: ToolResult::Completed {
                content,
                is_success,
                timestamp,
            },
        }
    }

    /// Whether this pair's result is still streaming.
    pub fn is_streaming(&self) -> bool {
        self.result.is_streaming()
    }
}
