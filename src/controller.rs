//! Per-thread reconciliation controller.
//!
//! One `ThreadController` is constructed when a conversation view mounts and
//! discarded when it unmounts; every override flag and cache lives on the
//! instance, so concurrent thread views never cross-contaminate. Two
//! producers write into the shared pair sequence: historical rebuilds
//! (guarded by a content signature) and live streaming fragments (tracked by
//! an explicit streaming handle). The visibility policy arbitrates between
//! automatic reveal and user intent.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, warn};

use crate::builder::build_pairs;
use crate::effects::HostEffect;
use crate::error::NavigationError;
use crate::models::Message;
use crate::pairs::ToolCallPair;
use crate::panel::{is_file_authoring_tool, is_important_tool, VisibilityState};
use crate::signature::signature_of;
use crate::stream::{RunStatus, ToolCallEvent};
use crate::traits::{MainFileScorer, NoopScorer};

/// How long the transient external-navigation index stays set.
pub const EXTERNAL_NAV_CLEAR: Duration = Duration::from_millis(100);
/// How long the transient "saved" indicator stays visible.
pub const SAVE_INDICATOR_CLEAR: Duration = Duration::from_secs(2);

/// Reconciliation state for one conversation view.
pub struct ThreadController {
    pairs: Vec<ToolCallPair>,
    index_by_assistant_id: HashMap<String, usize>,
    assistant_order: Vec<String>,
    /// Explicit handle to the single in-progress entry; the "at most one
    /// streaming pair" invariant holds by construction.
    streaming_index: Option<usize>,
    visibility: VisibilityState,
    run_status: RunStatus,
    /// Fingerprint of the last accepted historical rebuild.
    last_signature: Option<String>,
    /// Transient index signalling an imperative scroll, with its deadline.
    external_nav: Option<(usize, Instant)>,
    /// Deadline for the transient "saved" indicator.
    save_indicator_until: Option<Instant>,
    effects: Vec<HostEffect>,
    scorer: Box<dyn MainFileScorer>,
}

impl Default for ThreadController {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ThreadController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadController")
            .field("pairs", &self.pairs.len())
            .field("streaming_index", &self.streaming_index)
            .field("visibility", &self.visibility)
            .field("run_status", &self.run_status)
            .finish()
    }
}

impl ThreadController {
    /// Create a controller with the default (no-op) main-file scorer.
    pub fn new() -> Self {
        Self::with_scorer(Box::new(NoopScorer))
    }

    /// Create a controller with a host-provided main-file scorer.
    pub fn with_scorer(scorer: Box<dyn MainFileScorer>) -> Self {
        Self {
            pairs: Vec::new(),
            index_by_assistant_id: HashMap::new(),
            assistant_order: Vec::new(),
            streaming_index: None,
            visibility: VisibilityState::default(),
            run_status: RunStatus::Idle,
            last_signature: None,
            external_nav: None,
            save_indicator_until: None,
            effects: Vec::new(),
            scorer,
        }
    }

    // ------------------------------------------------------------------
    // Read surface
    // ------------------------------------------------------------------

    /// The ordered call/result pair sequence.
    pub fn pairs(&self) -> &[ToolCallPair] {
        &self.pairs
    }

    /// Index of the focused pair.
    pub fn current_index(&self) -> usize {
        self.visibility.current_index
    }

    /// Whether the side panel is open.
    pub fn is_panel_open(&self) -> bool {
        self.visibility.is_open
    }

    /// Full visibility state, for host rendering.
    pub fn visibility(&self) -> &VisibilityState {
        &self.visibility
    }

    /// Last reported run status.
    pub fn run_status(&self) -> RunStatus {
        self.run_status
    }

    /// Transient external-navigation index, until `on_tick` clears it.
    pub fn external_nav_index(&self) -> Option<usize> {
        self.external_nav.map(|(index, _)| index)
    }

    /// Whether the transient "saved" indicator is showing.
    pub fn save_indicator_visible(&self) -> bool {
        self.save_indicator_until.is_some()
    }

    /// Take the queued host effects.
    pub fn drain_effects(&mut self) -> Vec<HostEffect> {
        std::mem::take(&mut self.effects)
    }

    // ------------------------------------------------------------------
    // Historical path
    // ------------------------------------------------------------------

    /// Rebuild the pair sequence from the persisted message list.
    ///
    /// Returns false (and leaves all derived state untouched) when the
    /// rebuilt sequence fingerprints identically to the current one; this
    /// guards streaming-entry edits against redundant recompute churn. On a
    /// real change the sequence, index map and streaming handle are replaced
    /// wholesale.
    pub fn on_historical_messages_changed(&mut self, messages: &[Message]) -> bool {
        let built = build_pairs(messages);
        let signature = signature_of(&built.pairs);
        if self.last_signature.as_deref() == Some(signature.as_str()) {
            debug!("historical rebuild skipped, signature unchanged");
            return false;
        }

        self.last_signature = Some(signature);
        self.pairs = built.pairs;
        self.index_by_assistant_id = built.index_by_assistant_id;
        self.assistant_order = built.assistant_order;
        self.streaming_index = None;

        if self.pairs.is_empty() {
            self.visibility.current_index = 0;
        } else if self.visibility.user_navigated {
            // Respect the user's position but keep it in range.
            self.visibility.current_index =
                self.visibility.current_index.min(self.pairs.len() - 1);
        } else {
            self.visibility.current_index = self.pairs.len() - 1;
        }
        debug!(pairs = self.pairs.len(), "historical pairs replaced");
        true
    }

    // ------------------------------------------------------------------
    // Streaming path
    // ------------------------------------------------------------------

    /// Fold one streaming tool-call fragment into the sequence.
    ///
    /// Discarded outright while `user_closed` is set: the user stopped
    /// following the run and automation must not fight them.
    pub fn on_streaming_event(&mut self, event: ToolCallEvent) {
        if self.visibility.user_closed {
            debug!("streaming event discarded, panel closed by user");
            return;
        }

        let name = event.display_name();
        let content = crate::format::shape_arguments(&name, &event.arguments);

        match self.streaming_index {
            // Same call, more tokens: update in place. Interleaved calls
            // without a terminal message between them can misattribute here;
            // known limitation of the most-recent-entry merge.
            Some(index) if self.pairs[index].call.name == name => {
                self.pairs[index].call.content = content.clone();
            }
            _ => {
                self.pairs
                    .push(ToolCallPair::streaming(name.clone(), content.clone(), Utc::now()));
                self.streaming_index = Some(self.pairs.len() - 1);
                debug!(tool = %name, index = self.pairs.len() - 1, "new streaming tool call");
            }
        }

        if !self.visibility.user_navigated {
            self.visibility.current_index = self.pairs.len() - 1;
        }

        self.evaluate_auto_open(&name, &content);
    }

    /// Auto-open policy: important tools force the panel open; file-authoring
    /// tools open it when the scorer flags the primary deliverable.
    fn evaluate_auto_open(&mut self, name: &str, content: &str) {
        if is_important_tool(name) {
            if self.visibility.auto_open() {
                debug!(tool = %name, "panel auto-opened for important tool");
            }
            return;
        }
        if is_file_authoring_tool(name) {
            let position = self.pairs.len().saturating_sub(1);
            let decision = self
                .scorer
                .evaluate(name, content, position, self.pairs.len());
            if decision.is_main_file && self.visibility.auto_open() {
                debug!(tool = %name, file = ?decision.file_name, "panel auto-opened for main file");
            }
        }
    }

    /// React to a run status transition.
    ///
    /// Terminal statuses (and a return to idle) reset the manual-navigation
    /// override so the next run may auto-follow again; completion arms the
    /// transient "saved" indicator.
    pub fn on_run_status_changed(&mut self, status: RunStatus, now: Instant) {
        let previous = self.run_status;
        self.run_status = status;

        if status == RunStatus::Idle || status.is_terminal() {
            self.visibility.reset_navigation();
            self.streaming_index = None;
        }
        if status == RunStatus::Completed {
            self.save_indicator_until = Some(now + SAVE_INDICATOR_CLEAR);
        }
        if previous != status {
            debug!(?previous, ?status, "run status changed");
        }
    }

    // ------------------------------------------------------------------
    // User actions
    // ------------------------------------------------------------------

    /// Toggle the panel. Closing is sticky; opening clears the sticky close
    /// and asks the host to collapse any competing side surface.
    pub fn toggle_panel(&mut self) {
        if self.visibility.is_open {
            self.visibility.close();
        } else {
            self.visibility.open();
            self.effects.push(HostEffect::CollapseCompetingSurfaces);
        }
    }

    /// Close the panel (sticky against automatic reopen).
    pub fn close_panel(&mut self) {
        self.visibility.close();
    }

    /// User focuses a pair by index. Out-of-range indices are ignored.
    pub fn set_current_index(&mut self, index: usize) {
        if index >= self.pairs.len() {
            debug!(index, pairs = self.pairs.len(), "navigation index out of range");
            return;
        }
        self.visibility.navigate(index);
    }

    /// User clicks a historical tool call in the transcript.
    ///
    /// Resolves the assistant message id through the index map, falling back
    /// to positional matching over the assistant order. On success the panel
    /// opens (clearing the sticky close), focus moves, and a transient
    /// external-navigation index signals the imperative scroll. On double
    /// failure the host gets exactly one informational notice and state is
    /// unchanged.
    pub fn on_tool_clicked(
        &mut self,
        assistant_message_id: &str,
        tool_name: &str,
        now: Instant,
    ) -> Result<usize, NavigationError> {
        let index = self
            .index_by_assistant_id
            .get(assistant_message_id)
            .copied()
            .or_else(|| {
                self.assistant_order
                    .iter()
                    .position(|id| id == assistant_message_id)
                    .filter(|&position| position < self.pairs.len())
            });

        let Some(index) = index else {
            warn!(assistant_message_id, tool_name, "clicked tool call not found");
            self.effects.push(HostEffect::Notice {
                message: format!("Could not find the {tool_name} tool call"),
            });
            return Err(NavigationError::PairNotFound {
                assistant_message_id: assistant_message_id.to_string(),
            });
        };

        self.visibility.open();
        self.visibility.navigate(index);
        self.external_nav = Some((index, now + EXTERNAL_NAV_CLEAR));
        self.effects.push(HostEffect::ScrollToPair { index });
        Ok(index)
    }

    // ------------------------------------------------------------------
    // Time
    // ------------------------------------------------------------------

    /// Expire transient state whose deadline has passed. Driven by the host
    /// event loop; a discarded controller simply never ticks again, so no
    /// clear can fire after the owning view is gone.
    pub fn on_tick(&mut self, now: Instant) {
        if let Some((_, deadline)) = self.external_nav {
            if now >= deadline {
                self.external_nav = None;
            }
        }
        if let Some(deadline) = self.save_indicator_until {
            if now >= deadline {
                self.save_indicator_until = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MessageRole;

    fn streaming_event(name: &str, arguments: &str) -> ToolCallEvent {
        ToolCallEvent {
            name: Some(name.to_string()),
            xml_tag_name: None,
            arguments: arguments.to_string(),
        }
    }

    fn history(entries: &[(&str, &str)]) -> Vec<Message> {
        let mut messages = Vec::new();
        for (i, (name, result)) in entries.iter().enumerate() {
            let aid = format!("a{i}");
            messages.push(Message::new(
                aid.clone(),
                MessageRole::Assistant,
                format!(r#"{{"tool_calls": [{{"name": "{name}"}}]}}"#),
            ));
            messages.push(
                Message::new(format!("t{i}"), MessageRole::Tool, result.to_string())
                    .answering(aid),
            );
        }
        messages
    }

    #[test]
    fn test_new_controller_is_empty() {
        let ctrl = ThreadController::new();
        assert!(ctrl.pairs().is_empty());
        assert_eq!(ctrl.current_index(), 0);
        assert!(!ctrl.is_panel_open());
        assert_eq!(ctrl.run_status(), RunStatus::Idle);
    }

    #[test]
    fn test_historical_rebuild_replaces_state() {
        let mut ctrl = ThreadController::new();
        let changed = ctrl.on_historical_messages_changed(&history(&[
            ("read_file", r#"{"success": true}"#),
            ("execute_command", r#"{"success": false}"#),
        ]));
        assert!(changed);
        assert_eq!(ctrl.pairs().len(), 2);
        assert_eq!(ctrl.current_index(), 1);
    }

    #[test]
    fn test_historical_rebuild_idempotent() {
        let mut ctrl = ThreadController::new();
        let messages = history(&[("read_file", r#"{"success": true}"#)]);
        assert!(ctrl.on_historical_messages_changed(&messages));
        assert!(!ctrl.on_historical_messages_changed(&messages));
    }

    #[test]
    fn test_streaming_append_then_update() {
        let mut ctrl = ThreadController::new();
        ctrl.on_streaming_event(streaming_event("execute_command", r#"{"command": "ls"#));
        assert_eq!(ctrl.pairs().len(), 1);
        assert!(ctrl.pairs()[0].is_streaming());

        // Same tool: in-place update, length unchanged.
        ctrl.on_streaming_event(streaming_event("execute_command", r#"{"command": "ls -la"}"#));
        assert_eq!(ctrl.pairs().len(), 1);
        assert_eq!(
            ctrl.pairs()[0].call.content,
            "<execute-command>ls -la</execute-command>"
        );
    }

    #[test]
    fn test_streaming_new_tool_appends() {
        let mut ctrl = ThreadController::new();
        ctrl.on_streaming_event(streaming_event("create_file", "{}"));
        ctrl.on_streaming_event(streaming_event("execute_command", "{}"));
        assert_eq!(ctrl.pairs().len(), 2);
        // Previous entry is left as-is, still marked streaming.
        assert!(ctrl.pairs()[0].is_streaming());
        assert_eq!(ctrl.current_index(), 1);
    }

    #[test]
    fn test_streaming_discarded_after_user_close() {
        let mut ctrl = ThreadController::new();
        ctrl.close_panel();
        ctrl.on_streaming_event(streaming_event("deploy", "{}"));
        assert!(ctrl.pairs().is_empty());
        assert!(!ctrl.is_panel_open());
    }

    #[test]
    fn test_important_tool_opens_panel_once() {
        let mut ctrl = ThreadController::new();
        ctrl.on_streaming_event(streaming_event("deploy", r#"{"a": 1}"#));
        assert!(ctrl.is_panel_open());
        assert!(ctrl.visibility().auto_opened);
        ctrl.on_streaming_event(streaming_event("deploy", r#"{"a": 2}"#));
        assert!(ctrl.is_panel_open());
        assert_eq!(ctrl.pairs().len(), 1);
    }

    #[test]
    fn test_unimportant_tool_does_not_open_panel() {
        let mut ctrl = ThreadController::new();
        ctrl.on_streaming_event(streaming_event("web_search", "{}"));
        assert!(!ctrl.is_panel_open());
    }

    #[test]
    fn test_user_navigation_suppresses_follow() {
        let mut ctrl = ThreadController::new();
        ctrl.on_streaming_event(streaming_event("read_file", "{}"));
        ctrl.on_streaming_event(streaming_event("create_file", "{}"));
        ctrl.set_current_index(0);
        ctrl.on_streaming_event(streaming_event("execute_command", "{}"));
        assert_eq!(ctrl.current_index(), 0);

        // Run returns to idle: override resets, next run follows again.
        ctrl.on_run_status_changed(RunStatus::Idle, Instant::now());
        ctrl.on_streaming_event(streaming_event("delete_file", "{}"));
        assert_eq!(ctrl.current_index(), ctrl.pairs().len() - 1);
    }

    #[test]
    fn test_terminal_status_clears_streaming_handle() {
        let mut ctrl = ThreadController::new();
        ctrl.on_streaming_event(streaming_event("execute_command", "{}"));
        ctrl.on_run_status_changed(RunStatus::Stopped, Instant::now());
        // A new run's identically named call starts a fresh entry.
        ctrl.on_streaming_event(streaming_event("execute_command", "{}"));
        assert_eq!(ctrl.pairs().len(), 2);
    }

    #[test]
    fn test_completed_arms_save_indicator() {
        let mut ctrl = ThreadController::new();
        let now = Instant::now();
        ctrl.on_run_status_changed(RunStatus::Completed, now);
        assert!(ctrl.save_indicator_visible());
        ctrl.on_tick(now + SAVE_INDICATOR_CLEAR);
        assert!(!ctrl.save_indicator_visible());
    }

    #[test]
    fn test_toggle_panel_round_trip() {
        let mut ctrl = ThreadController::new();
        ctrl.toggle_panel();
        assert!(ctrl.is_panel_open());
        assert_eq!(ctrl.drain_effects(), vec![HostEffect::CollapseCompetingSurfaces]);
        ctrl.toggle_panel();
        assert!(!ctrl.is_panel_open());
        assert!(ctrl.visibility().user_closed);
        assert!(ctrl.drain_effects().is_empty());
    }

    #[test]
    fn test_click_resolves_through_index_map() {
        let mut ctrl = ThreadController::new();
        ctrl.on_historical_messages_changed(&history(&[
            ("read_file", r#"{"success": true}"#),
            ("execute_command", r#"{"success": true}"#),
        ]));
        ctrl.close_panel();

        let now = Instant::now();
        let index = ctrl.on_tool_clicked("a0", "read-file", now).unwrap();
        assert_eq!(index, 0);
        assert!(ctrl.is_panel_open());
        assert!(!ctrl.visibility().user_closed);
        assert!(ctrl.visibility().user_navigated);
        assert_eq!(ctrl.external_nav_index(), Some(0));
        assert_eq!(ctrl.drain_effects(), vec![HostEffect::ScrollToPair { index: 0 }]);

        ctrl.on_tick(now + EXTERNAL_NAV_CLEAR);
        assert_eq!(ctrl.external_nav_index(), None);
    }

    #[test]
    fn test_click_positional_fallback() {
        let mut ctrl = ThreadController::new();
        ctrl.on_historical_messages_changed(&history(&[("read_file", r#"{"success": true}"#)]));
        // Remove the direct mapping to force the fallback.
        ctrl.index_by_assistant_id.clear();
        let index = ctrl.on_tool_clicked("a0", "read-file", Instant::now()).unwrap();
        assert_eq!(index, 0);
    }

    #[test]
    fn test_click_miss_notifies_once() {
        let mut ctrl = ThreadController::new();
        ctrl.on_historical_messages_changed(&history(&[("read_file", r#"{"success": true}"#)]));
        let before = ctrl.visibility().clone();

        let result = ctrl.on_tool_clicked("missing", "read-file", Instant::now());
        assert_eq!(
            result,
            Err(NavigationError::PairNotFound {
                assistant_message_id: "missing".to_string()
            })
        );
        let effects = ctrl.drain_effects();
        assert_eq!(effects.len(), 1);
        assert!(matches!(effects[0], HostEffect::Notice { .. }));
        // Sequence and visibility unchanged.
        assert_eq!(ctrl.visibility(), &before);
        assert_eq!(ctrl.pairs().len(), 1);
    }

    #[test]
    fn test_set_current_index_out_of_range_ignored() {
        let mut ctrl = ThreadController::new();
        ctrl.set_current_index(5);
        assert_eq!(ctrl.current_index(), 0);
        assert!(!ctrl.visibility().user_navigated);
    }

    #[test]
    fn test_rebuild_clamps_user_position() {
        let mut ctrl = ThreadController::new();
        ctrl.on_historical_messages_changed(&history(&[
            ("read_file", r#"{"success": true}"#),
            ("execute_command", r#"{"success": true}"#),
            ("delete_file", r#"{"success": true}"#),
        ]));
        ctrl.set_current_index(2);
        ctrl.on_historical_messages_changed(&history(&[("read_file", r#"{"success": true}"#)]));
        assert_eq!(ctrl.current_index(), 0);
        assert!(ctrl.visibility().user_navigated);
    }

    #[test]
    fn test_rebuild_overwrites_streaming_entry() {
        // Accepted race: a historical rebuild between two fragments replaces
        // the in-flight entry; the signature guard only helps when content
        // is unchanged.
        let mut ctrl = ThreadController::new();
        ctrl.on_streaming_event(streaming_event("execute_command", "{}"));
        ctrl.on_historical_messages_changed(&history(&[("read_file", r#"{"success": true}"#)]));
        assert_eq!(ctrl.pairs().len(), 1);
        assert!(!ctrl.pairs()[0].is_streaming());
    }
}
