//! Model endpoint error types

use thiserror::Error;

/// Error from a chat completion, with classification
#[derive(Debug, Error)]
#[error("{message}")]
pub struct LlmError {
    pub kind: LlmErrorKind,
    pub message: String,
}

impl LlmError {
    pub fn new(kind: LlmErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(LlmErrorKind::Network, message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(LlmErrorKind::Server, message)
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(LlmErrorKind::Protocol, message)
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmErrorKind {
    /// Endpoint unreachable, connection dropped, request timed out
    Network,
    /// Endpoint answered with a non-success status
    Server,
    /// Response body or stream could not be understood
    Protocol,
}
