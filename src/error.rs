//! Error types for the reconciliation core.
//!
//! Almost every failure here degrades silently (malformed payloads fall
//! through extraction strategies, missing pairings are simply excluded). The
//! one surfaced failure is a click on a tool call the index cannot resolve;
//! it reaches the host as an informational notice, never as a panic.

use thiserror::Error;

/// Failure to resolve a clicked tool call to a pair index.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NavigationError {
    /// Neither the direct id mapping nor the positional fallback found the
    /// clicked assistant message.
    #[error("no tool call found for message {assistant_message_id}")]
    PairNotFound { assistant_message_id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_message() {
        let err = NavigationError::PairNotFound {
            assistant_message_id: "a-42".to_string(),
        };
        assert_eq!(err.to_string(), "no tool call found for message a-42");
    }
}
