//! emberchat - WebSocket chat relay for a locally hosted Ollama runtime
//!
//! Accepts chat messages over a WebSocket, decides per turn whether to
//! expose tools to the model, dispatches requested tool calls, and relays
//! the final answer back to the client.

mod api;
mod chat;
mod llm;
mod tools;

use api::{create_router, AppState};
use llm::{OllamaClient, OllamaConfig};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging; default level keeps model replies visible
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "emberchat=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Configuration
    let port: u16 = std::env::var("EMBERCHAT_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(4000);

    let config = OllamaConfig::from_env();
    tracing::info!(url = %config.base_url, "Make sure Ollama is running");
    tracing::info!(model = %config.model, "Current model");

    let state = AppState::new(OllamaClient::new(config));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("emberchat listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
