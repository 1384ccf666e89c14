//! Streaming transport types.
//!
//! The live transport delivers tool-call fragments and a run status for one
//! agent run. This core only reacts to the delivered values; opening and
//! closing the transport belongs to the host.

use serde::{Deserialize, Serialize};

use crate::extract::normalize_tool_name;

/// Run lifecycle status reported by the streaming transport.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    #[default]
    Idle,
    Connecting,
    Streaming,
    Completed,
    Stopped,
    Error,
    Failed,
    AgentNotRunning,
}

impl RunStatus {
    /// Whether this status ends a run (the panel's manual-navigation memory
    /// resets on these, and on a return to `Idle`).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Completed
                | RunStatus::Stopped
                | RunStatus::Error
                | RunStatus::Failed
                | RunStatus::AgentNotRunning
        )
    }

    /// Whether a run is currently underway.
    pub fn is_active(&self) -> bool {
        matches!(self, RunStatus::Connecting | RunStatus::Streaming)
    }
}

/// One incremental tool-call fragment from the live transport.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ToolCallEvent {
    /// Raw tool name, when the transport provides one.
    #[serde(default)]
    pub name: Option<String>,
    /// Tag-form tool name, the transport's alternative identity field.
    #[serde(default)]
    pub xml_tag_name: Option<String>,
    /// Raw accumulated arguments for this call so far.
    #[serde(default)]
    pub arguments: String,
}

impl ToolCallEvent {
    /// Resolve the canonical display name: `name`, then `xml_tag_name`,
    /// then the placeholder.
    pub fn display_name(&self) -> String {
        let raw = self
            .name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.xml_tag_name.as_deref().filter(|s| !s.trim().is_empty()))
            .unwrap_or("Unknown Tool");
        normalize_tool_name(raw)
    }
}
