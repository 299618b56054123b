//! HTTP/WebSocket surface for emberchat

mod handlers;
mod ws;

pub use handlers::create_router;

use crate::llm::OllamaClient;
use crate::tools::ToolRegistry;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<OllamaClient>,
    pub tools: Arc<ToolRegistry>,
}

impl AppState {
    pub fn new(client: OllamaClient) -> Self {
        Self {
            client: Arc::new(client),
            tools: Arc::new(ToolRegistry::new()),
        }
    }
}
