//! Conversation message types shared by the pair builder and the controller.
//!
//! Messages arrive from the backend as persisted records or are synthesized
//! locally during streaming. The reconciliation core only reads them; it
//! never writes back into the canonical message list it was given.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a message within a thread.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
    Tool,
    System,
    Status,
}

/// Structured metadata attached to a message by the backend.
///
/// Tool result messages reference the assistant message they answer via
/// `assistant_message_id`. Unknown backend fields are preserved in `extra`
/// rather than rejected, since the backend adds fields without notice.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MessageMetadata {
    /// The assistant message this tool result answers, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistant_message_id: Option<String>,
    /// Backend fields this core does not interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One conversation turn as persisted or streamed.
///
/// `content` is the raw payload; for assistant and tool messages it may
/// itself be a JSON document, which the extraction strategies parse
/// leniently.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Identifier unique within the thread (may be empty for local stubs).
    pub id: String,
    /// Role of the message sender.
    pub role: MessageRole,
    /// Raw content (string, possibly a serialized JSON structure).
    pub content: String,
    /// Optional structured metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MessageMetadata>,
    /// When the message was created.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    /// When the message was last updated.
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Message {
    /// Create a message with the given id, role and content.
    pub fn new(id: impl Into<String>, role: MessageRole, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            role,
            content: content.into(),
            metadata: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attach metadata referencing the assistant message this tool result
    /// answers.
    pub fn answering(mut self, assistant_message_id: impl Into<String>) -> Self {
        let meta = self.metadata.get_or_insert_with(MessageMetadata::default);
        meta.assistant_message_id = Some(assistant_message_id.into());
        self
    }

    /// Override the creation timestamp (the update timestamp follows).
    pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self.updated_at = at;
        self
    }

    /// The assistant message id this message answers, if it carries one.
    pub fn answers(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.assistant_message_id.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_new_sets_timestamps() {
        let msg = Message::new("m1", MessageRole::User, "hello");
        assert_eq!(msg.id, "m1");
        assert_eq!(msg.role, MessageRole::User);
        assert_eq!(msg.created_at, msg.updated_at);
        assert!(msg.metadata.is_none());
    }

    #[test]
    fn test_answering_attaches_metadata() {
        let msg = Message::new("t1", MessageRole::Tool, "done").answering("a1");
        assert_eq!(msg.answers(), Some("a1"));
    }

    #[test]
    fn test_answers_without_metadata() {
        let msg = Message::new("t1", MessageRole::Tool, "done");
        assert_eq!(msg.answers(), None);
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&MessageRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
        let role: MessageRole = serde_json::from_str("\"tool\"").unwrap();
        assert_eq!(role, MessageRole::Tool);
    }

    #[test]
    fn test_metadata_preserves_unknown_fields() {
        let json = r#"{"assistant_message_id": "a1", "agent_id": "agent-7"}"#;
        let meta: MessageMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.assistant_message_id, Some("a1".to_string()));
        assert_eq!(
            meta.extra.get("agent_id").and_then(|v| v.as_str()),
            Some("agent-7")
        );
    }

    #[test]
    fn test_message_deserializes_without_timestamps() {
        let json = r#"{"id": "m1", "role": "user", "content": "hi"}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.id, "m1");
        assert_eq!(msg.content, "hi");
    }
}
