//! Conversation core: transcript, tool gating, and the turn orchestrator

mod gate;
mod orchestrator;
mod transcript;

#[allow(unused_imports)] // Public API re-exports
pub use gate::{KeywordGate, ToolGate};
pub use orchestrator::Orchestrator;
#[allow(unused_imports)] // Public API re-exports
pub use transcript::Transcript;
