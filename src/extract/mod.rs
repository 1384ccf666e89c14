//! Payload extraction strategies.
//!
//! The backend persists tool names and outcomes in several JSON shapes, plus
//! two legacy raw-text forms. Instead of nested shape-sniffing conditionals,
//! each shape is a typed strategy tried in a fixed priority order; the first
//! success wins and the order is independently testable.

mod outcome;
mod tool_name;

pub use outcome::{resolve_outcome, OutcomeStrategy, OUTCOME_STRATEGIES};
pub use tool_name::{normalize_tool_name, resolve_tool_name, NameStrategy, NAME_STRATEGIES};
