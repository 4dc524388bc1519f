use axum::{
    routing::{get, post},
    Router,
};

use crate::server::AppState;

use super::health::health;
use super::webhook::receive_webhook;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health
        .route("/health", get(health))
        // Alertmanager webhook receiver
        .route("/hook", post(receive_webhook))
}
