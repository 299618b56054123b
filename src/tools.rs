//! Tool implementations for emberchat
//!
//! A tool is an external capability the model can invoke mid-conversation.
//! Tools always answer in text: every failure is converted into a
//! descriptive result the model can read and react to, never a turn error.

mod weather;

pub use weather::WeatherTool;

use crate::llm::ToolDefinition;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Arguments of one tool call, as the JSON object the model produced
pub type ToolArgs = Map<String, Value>;

/// Trait for tools that can be invoked by the model
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name, as advertised to the model
    fn name(&self) -> &'static str;

    /// Tool description for the model
    fn description(&self) -> String;

    /// JSON schema for the tool's arguments
    fn parameters(&self) -> Value;

    /// Execute the tool. Must not fail: missing or mistyped arguments are
    /// reported in the returned text.
    async fn invoke(&self, args: &ToolArgs) -> String;
}

/// Fixed catalog of tools available to the conversation
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        let tools: Vec<Arc<dyn Tool>> = vec![Arc::new(WeatherTool)];
        Self { tools }
    }

    /// Get all tool definitions to advertise to the model
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| ToolDefinition::function(t.name(), t.description(), t.parameters()))
            .collect()
    }

    /// Invoke a tool by name. An unregistered name yields an error text
    /// rather than a failure, so the model can recover.
    pub async fn dispatch(&self, name: &str, args: &ToolArgs) -> String {
        for tool in &self.tools {
            if tool.name() == name {
                return tool.invoke(args).await;
            }
        }
        format!("Unknown tool: {name}")
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
