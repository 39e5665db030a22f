//! Axum Router Configuration
//!
//! The HTTP surface is deliberately small: the bundled single-page client,
//! a liveness route, and the WebSocket endpoint that carries the interview.

use crate::{state::AppState, ws::ws_handler};
use axum::{Json, Router, response::Html, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;

async fn index() -> Html<&'static str> {
    Html(include_str!("../assets/index.html"))
}

async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/ws", get(ws_handler))
        .with_state(app_state)
}
