//! Content fingerprint for the derived pair sequence.
//!
//! Historical rebuilds fire on every message-list change; the signature lets
//! the controller skip the wholesale state replacement (and the index/handle
//! resets that come with it) when nothing the panel displays has changed.

use crate::pairs::{ToolCallPair, ToolResult};

/// Content longer than this is truncated inside the signature.
const TRUNCATE_OVER: usize = 160;
/// Characters kept from the head of truncated content.
const HEAD_CHARS: usize = 80;
/// Characters kept from the tail of truncated content.
const TAIL_CHARS: usize = 40;

/// Compute the fingerprint of a pair sequence.
///
/// Stable for identical input; changes whenever any pair's displayed content
/// would visibly differ. Long content is truncated (80-char head + 40-char
/// tail), so differing payloads with identical head and tail collide — a
/// known, accepted trade for cheap comparison.
pub fn signature_of(pairs: &[ToolCallPair]) -> String {
    let mut parts = Vec::with_capacity(pairs.len());
    for pair in pairs {
        let (result_stamp, result_content) = match &pair.result {
            ToolResult::Streaming => ("streaming".to_string(), String::new()),
            ToolResult::Completed {
                content, timestamp, ..
            } => (timestamp.to_rfc3339(), truncate(content)),
        };
        parts.push(format!(
            "{}|{}|{}|{}|{}",
            pair.call.name,
            pair.call.timestamp.to_rfc3339(),
            truncate(&pair.call.content),
            result_stamp,
            result_content,
        ));
    }
    parts.join("\n")
}

/// Truncate content to an 80-char head plus 40-char tail when it exceeds
/// 160 chars. Operates on chars, so multi-byte content never splits.
fn truncate(content: &str) -> String {
    let char_count = content.chars().count();
    if char_count <= TRUNCATE_OVER {
        return content.to_string();
    }
    let head: String = content.chars().take(HEAD_CHARS).collect();
    let tail: String = content.chars().skip(char_count - TAIL_CHARS).collect();
    format!("{head}…{tail}")
}
