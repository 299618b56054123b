//! WebSocket chat relay
//!
//! One connection, one conversation: each socket gets its own orchestrator
//! and transcript, and turns on a connection run strictly in sequence; the
//! next inbound message isn't read until the current turn finishes.

use super::AppState;
use crate::chat::Orchestrator;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use serde::{Deserialize, Serialize};

/// Wire envelope, both directions. Inbound `type` is informational only;
/// outbound `type` is always `"server"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    pub time: String,
}

impl Envelope {
    /// Outbound server envelope stamped with the current wall-clock time.
    pub fn server(content: impl Into<String>) -> Self {
        Self {
            kind: "server".to_string(),
            content: content.into(),
            time: timestamp(),
        }
    }
}

fn timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

/// Shown to the user when the model endpoint fails; internals stay in logs.
const APOLOGY: &str =
    "Sorry, I'm having trouble connecting to the AI service. Please try again later.";

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let conn_id = uuid::Uuid::new_v4();
    tracing::info!(%conn_id, "web client connected");

    let mut orchestrator = Orchestrator::new(state.client.clone(), state.tools.clone());

    while let Some(frame) = socket.recv().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!(%conn_id, error = %e, "error reading message");
                break;
            }
        };

        let text = match frame {
            Message::Text(text) => text,
            Message::Close(_) => break,
            // ping/pong handled by axum, binary frames ignored
            _ => continue,
        };

        let envelope: Envelope = match serde_json::from_str(&text) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::error!(%conn_id, error = %e, "malformed envelope");
                break;
            }
        };
        tracing::debug!(%conn_id, content = %envelope.content, "received message");

        let reply = match orchestrator.handle(&envelope.content).await {
            Ok(answer) => Envelope::server(answer),
            Err(e) => {
                tracing::error!(%conn_id, error = %e, "model turn failed");
                Envelope::server(APOLOGY)
            }
        };

        let Ok(payload) = serde_json::to_string(&reply) else {
            tracing::error!(%conn_id, "failed to encode reply envelope");
            break;
        };
        if let Err(e) = socket.send(Message::Text(payload)).await {
            tracing::error!(%conn_id, error = %e, "error writing message");
            break;
        }
    }

    tracing::info!(%conn_id, "client disconnected");
}
