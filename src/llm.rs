//! Model-client abstraction over the local Ollama runtime
//!
//! Provides the chat wire types and a trait seam so the conversation core
//! can be exercised against a scripted client in tests.

mod error;
mod ollama;
mod types;

#[allow(unused_imports)] // Public API re-exports
pub use error::{LlmError, LlmErrorKind};
pub use ollama::{OllamaClient, OllamaConfig};
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// Client for one chat completion against the model endpoint.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send the full conversation and get the assistant's reply.
    ///
    /// `tools` may be empty; a non-empty tool list is an offer, not a
    /// mandate, and the reply may still carry zero tool calls.
    /// Implementations that stream must drain the stream and return one
    /// assembled message.
    async fn chat(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<ChatMessage, LlmError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}

#[async_trait]
impl<T: ModelClient + ?Sized> ModelClient for Arc<T> {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<ChatMessage, LlmError> {
        (**self).chat(messages, tools).await
    }

    fn model_id(&self) -> &str {
        (**self).model_id()
    }
}
