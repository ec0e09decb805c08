use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::SENTINEL_TIMESTAMP;
use crate::config::Config;
use crate::pipeline;

/// Shared state for all request handlers
#[derive(Clone)]
pub struct AppState {
    pub client: reqwest::Client,
    pub config: Arc<Config>,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub video_url: String,
    pub topic: String,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub timestamp: String,
    pub video_url: String,
    pub topic: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ask", post(ask))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

/// The one substantive endpoint. Content failures never become error statuses:
/// every pipeline error collapses to the sentinel timestamp here, and the
/// inputs are echoed back unmodified.
async fn ask(State(state): State<AppState>, Json(req): Json<AskRequest>) -> Json<AskResponse> {
    let timestamp = pipeline::locate(&state.client, &state.config, &req.video_url, &req.topic)
        .await
        .unwrap_or_else(|e| {
            warn!("Request for {} degraded to sentinel: {e}", req.video_url);
            SENTINEL_TIMESTAMP.to_string()
        });

    Json(AskResponse {
        timestamp,
        video_url: req.video_url,
        topic: req.topic,
    })
}
