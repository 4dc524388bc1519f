// Shared components
pub mod config;
pub mod error;
pub mod telemetry;

// Domain layer
pub mod alertmanager;
pub mod notification;
pub mod ntfy;
pub mod template;

// Application layer
pub mod api;
pub mod server;

// Supporting modules
pub mod shutdown;
