//! Side panel visibility state.
//!
//! The panel balances automatic reveal against user intent: once the user
//! closes it or navigates manually, automation must not override them.
//! `user_closed` is sticky until an explicit open; `user_navigated` resets
//! when the run lifecycle returns to idle.

use serde::{Deserialize, Serialize};

/// Tools whose execution forces the panel open while streaming.
pub const IMPORTANT_TOOLS: [&str; 4] = [
    "deploy",
    "expose-port",
    "create-credential-profile",
    "connect-credential-profile",
];

/// Tools that author files; candidates for the main-file heuristic.
pub const FILE_AUTHORING_TOOLS: [&str; 3] = ["create-file", "full-file-rewrite", "edit-file"];

/// Whether a tool is on the force-open allow-list.
pub fn is_important_tool(name: &str) -> bool {
    IMPORTANT_TOOLS.contains(&name)
}

/// Whether a tool authors files.
pub fn is_file_authoring_tool(name: &str) -> bool {
    FILE_AUTHORING_TOOLS.contains(&name)
}

/// Panel visibility and override flags, owned by the controller.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VisibilityState {
    /// Whether the side panel is open.
    pub is_open: bool,
    /// Index of the focused pair in the sequence.
    pub current_index: usize,
    /// User explicitly closed the panel; suppresses all automatic opens.
    pub user_closed: bool,
    /// User manually navigated; suppresses automatic index-following until
    /// the run returns to idle.
    pub user_navigated: bool,
    /// The last open was automatic rather than user-initiated.
    pub auto_opened: bool,
}

impl VisibilityState {
    /// User closes the panel. Sticky: no automatic open fires afterwards.
    pub fn close(&mut self) {
        self.is_open = false;
        self.user_closed = true;
        self.auto_opened = false;
    }

    /// User opens the panel, clearing the sticky close.
    pub fn open(&mut self) {
        self.is_open = true;
        self.user_closed = false;
        self.auto_opened = false;
    }

    /// Automatic open. Returns true only on the closed-to-open edge, so a
    /// stream of important-tool fragments opens the panel exactly once.
    /// A no-op while `user_closed` is set.
    pub fn auto_open(&mut self) -> bool {
        if self.user_closed || self.is_open {
            return false;
        }
        self.is_open = true;
        self.auto_opened = true;
        true
    }

    /// User focuses a specific index.
    pub fn navigate(&mut self, index: usize) {
        self.current_index = index;
        self.user_navigated = true;
    }

    /// Run lifecycle returned to idle; the next run may auto-follow again.
    pub fn reset_navigation(&mut self) {
        self.user_navigated = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_important_tool_allow_list() {
        assert!(is_important_tool("deploy"));
        assert!(is_important_tool("expose-port"));
        assert!(is_important_tool("create-credential-profile"));
        assert!(is_important_tool("connect-credential-profile"));
        assert!(!is_important_tool("read-file"));
    }

    #[test]
    fn test_close_is_sticky_against_auto_open() {
        let mut state = VisibilityState::default();
        state.close();
        assert!(!state.auto_open());
        assert!(!state.is_open);
    }

    #[test]
    fn test_auto_open_fires_once_per_edge() {
        let mut state = VisibilityState::default();
        assert!(state.auto_open());
        assert!(state.is_open);
        assert!(state.auto_opened);
        // Already open: no further transition.
        assert!(!state.auto_open());
    }

    #[test]
    fn test_open_clears_sticky_close() {
        let mut state = VisibilityState::default();
        state.close();
        state.open();
        assert!(state.is_open);
        assert!(!state.user_closed);
        // Automation may fire again after a later close-less state.
        state.is_open = false;
        assert!(state.auto_open());
    }

    #[test]
    fn test_navigate_sets_override() {
        let mut state = VisibilityState::default();
        state.navigate(3);
        assert_eq!(state.current_index, 3);
        assert!(state.user_navigated);
        state.reset_navigation();
        assert!(!state.user_navigated);
    }
}
