//! Ollama chat client
//!
//! Speaks `POST /api/chat` against a locally hosted Ollama server. Responses
//! are requested as an NDJSON stream; the client drains the stream and hands
//! back one assembled assistant message, so callers never see partial
//! content or tool calls.

use super::types::{ChatMessage, ToolDefinition};
use super::{LlmError, ModelClient};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "llama3.1:8b";

/// Endpoint configuration, overridable from the environment
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
}

impl OllamaConfig {
    /// Read `OLLAMA_URL` and `OLLAMA_MODEL`, falling back to the defaults.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("OLLAMA_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            model: std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

/// Client for the Ollama chat API
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model,
        }
    }

    fn api_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolDefinition]>,
}

/// One NDJSON line of a streamed chat response
#[derive(Debug, Deserialize)]
struct ChatChunk {
    #[serde(default)]
    message: Option<ChatMessage>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Accumulates streamed chunks into one final assistant message.
#[derive(Debug, Default)]
struct MessageAssembler {
    content: String,
    tool_calls: Vec<super::types::ToolCall>,
    done: bool,
}

impl MessageAssembler {
    fn push_line(&mut self, line: &[u8]) -> Result<(), LlmError> {
        if line.iter().all(u8::is_ascii_whitespace) {
            return Ok(());
        }
        let chunk: ChatChunk = serde_json::from_slice(line)
            .map_err(|e| LlmError::protocol(format!("malformed stream chunk: {e}")))?;
        self.push(chunk)
    }

    fn push(&mut self, chunk: ChatChunk) -> Result<(), LlmError> {
        if let Some(error) = chunk.error {
            return Err(LlmError::server(error));
        }
        if let Some(message) = chunk.message {
            self.content.push_str(&message.content);
            self.tool_calls.extend(message.tool_calls);
        }
        if chunk.done {
            self.done = true;
        }
        Ok(())
    }

    fn finish(self) -> Result<ChatMessage, LlmError> {
        if !self.done {
            return Err(LlmError::protocol("stream ended before the final chunk"));
        }
        Ok(ChatMessage::assistant_with_calls(
            self.content.trim().to_string(),
            self.tool_calls,
        ))
    }
}

#[async_trait]
impl ModelClient for OllamaClient {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<ChatMessage, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            stream: true,
            tools: if tools.is_empty() { None } else { Some(tools) },
        };

        let response = self
            .client
            .post(self.api_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::network(format!("request timeout: {e}"))
                } else if e.is_connect() {
                    LlmError::network(format!("connection failed: {e}"))
                } else {
                    LlmError::network(format!("request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body).map_or(body, |e| e.error);
            return Err(LlmError::server(format!("HTTP {status}: {message}")));
        }

        let mut stream = response.bytes_stream();
        let mut buf: Vec<u8> = Vec::new();
        let mut assembler = MessageAssembler::default();

        while let Some(item) = stream.next().await {
            let bytes =
                item.map_err(|e| LlmError::network(format!("stream read failed: {e}")))?;
            buf.extend_from_slice(&bytes);
            while let Some(newline) = buf.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = buf.drain(..=newline).collect();
                assembler.push_line(&line)?;
            }
        }
        // a well-formed stream ends with a newline, but don't count on it
        assembler.push_line(&buf)?;

        assembler.finish()
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
