//! Ordered conversation history

use crate::llm::{ChatMessage, Role};

/// Append-only history of one conversation.
///
/// Entries are never removed or reordered. The first entry, once the
/// conversation has started, is always the system message; it is inserted
/// exactly once. The history grows for the life of the owning connection;
/// it is never truncated, summarized, or persisted.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Insert the system message if the conversation has not started yet.
    pub fn bootstrap(&mut self, system_prompt: &str) {
        if self.messages.is_empty() {
            self.messages.push(ChatMessage::system(system_prompt));
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Roles in transcript order.
    #[allow(dead_code)] // Useful for tests
    pub fn roles(&self) -> Vec<Role> {
        self.messages.iter().map(|m| m.role).collect()
    }
}
