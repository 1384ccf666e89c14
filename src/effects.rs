//! Effects queued for the host view.
//!
//! The controller is a synchronous reducer; anything it wants the host to do
//! (collapse a competing surface, scroll the transcript, show a notice) is
//! queued as a `HostEffect` and drained by the host after each operation.

use serde::{Deserialize, Serialize};

/// A side effect the host should perform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostEffect {
    /// Opening the panel: collapse any mutually exclusive side surface.
    CollapseCompetingSurfaces,
    /// Imperatively scroll/focus the detail view to a pair.
    ScrollToPair { index: usize },
    /// Informational, non-blocking notice for the end user.
    Notice { message: String },
}
