//! Toolview - tool-call reconciliation and side-panel state for AI agent
//! conversation views.
//!
//! The crate is an in-process reducer: persisted messages and live streaming
//! fragments flow in, an ordered tool call/result sequence and a panel
//! visibility policy come out. It owns no transport, no persistence and no
//! rendering; the host view drives it and drains its effects.

pub mod builder;
pub mod controller;
pub mod effects;
pub mod error;
pub mod extract;
pub mod format;
pub mod models;
pub mod pairs;
pub mod panel;
pub mod prelude;
pub mod signature;
pub mod stream;
pub mod traits;
