//! API layer - HTTP endpoint handlers.

mod health;
mod routes;
mod webhook;

// Re-export all handlers for use in server/app.rs
pub use health::{health, HealthResponse};
pub use routes::api_routes;
pub use webhook::receive_webhook;
