//! Route handlers

use super::ws::ws_handler;
use super::AppState;
use axum::routing::get;
use axum::Router;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/version", get(get_version))
        .with_state(state)
}

async fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
