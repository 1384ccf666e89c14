//! Trait seams for external collaborators.
//!
//! The main-file scoring heuristic lives in the host (it knows about project
//! layout and deliverable conventions); the controller only consumes its
//! decision. The trait keeps the policy injectable and the controller
//! testable without the real scorer.

/// Decision returned by a main-file scorer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MainFileDecision {
    /// Whether the authored file looks like the primary deliverable.
    pub is_main_file: bool,
    /// File name the decision refers to, when one was identified.
    pub file_name: Option<String>,
    /// Heuristic score, for host-side logging.
    pub score: f32,
}

/// Judges whether a file-authoring tool call is producing the run's primary
/// deliverable. Consulted on each streaming fragment for file tools; a
/// positive decision force-opens the panel (unless the user closed it).
pub trait MainFileScorer {
    /// Evaluate one file-authoring fragment. `position` is the pair's index
    /// in the sequence, `total` the current sequence length.
    fn evaluate(&self, tool_name: &str, content: &str, position: usize, total: usize)
        -> MainFileDecision;
}

/// Default scorer: never flags a main file, so the panel only auto-opens
/// for the important-tool allow-list.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopScorer;

impl MainFileScorer for NoopScorer {
    fn evaluate(&self, _: &str, _: &str, _: usize, _: usize) -> MainFileDecision {
        MainFileDecision::default()
    }
}
