//! Heuristic gate deciding whether tools are advertised to the model
//!
//! Models differ in how eagerly they call tools; advertising tools on every
//! turn costs latency and invites spurious calls. The gate is a coarse
//! filter, not intent classification; false positives and negatives are
//! acceptable.

/// Strategy for deciding whether a user turn warrants advertising tools.
pub trait ToolGate: Send + Sync {
    fn needs_tools(&self, text: &str) -> bool;
}

/// Phrases signaling a need for live or current information.
const LIVE_DATA_PHRASES: &[&str] = &[
    "current weather",
    "weather today",
    "weather now",
    "weather in",
    "today's weather",
    "what's the weather",
    "how's the weather",
    "temperature in",
    "temperature at",
    "temp in",
    "current news",
    "latest news",
    "today's news",
    "current time",
    "what time is it",
    "current date",
    "what date is it",
    "stock price",
    "current stock",
    "live",
    "now",
    "currently",
    "today",
    "real-time",
    "up-to-date",
];

/// Case-insensitive substring match against the fixed phrase list.
/// Pure and deterministic; the empty string never matches.
pub struct KeywordGate;

impl ToolGate for KeywordGate {
    fn needs_tools(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        LIVE_DATA_PHRASES
            .iter()
            .any(|phrase| lowered.contains(phrase))
    }
}
