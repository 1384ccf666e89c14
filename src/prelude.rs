//! Prelude module for convenient imports.
//!
//! Re-exports the types a host conversation view touches when wiring up the
//! reconciliation core.
//!
//! # Usage
//!
//! ```ignore
//! use toolview::prelude::*;
//! ```

// Controller and its effect/error surface
pub use crate::controller::{ThreadController, EXTERNAL_NAV_CLEAR, SAVE_INDICATOR_CLEAR};
pub use crate::effects::HostEffect;
pub use crate::error::NavigationError;

// Model types
pub use crate::models::{Message, MessageMetadata, MessageRole};
pub use crate::pairs::{ToolCall, ToolCallPair, ToolResult};

// Streaming transport types
pub use crate::stream::{RunStatus, ToolCallEvent};

// Panel state and collaborator seams
pub use crate::panel::VisibilityState;
pub use crate::traits::{MainFileDecision, MainFileScorer, NoopScorer};
