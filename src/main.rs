use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;

use alert_push_bridge::config::Settings;
use alert_push_bridge::ntfy::NtfyClient;
use alert_push_bridge::server::{create_app, AppState};
use alert_push_bridge::shutdown::shutdown_signal;
use alert_push_bridge::telemetry::init_tracing;
use alert_push_bridge::template::NotificationTemplates;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let settings = Settings::new().context("Failed to load configuration")?;

    // Initialize tracing
    init_tracing(&settings.logging);
    tracing::info!(topic = %settings.ntfy.topic, "Configuration loaded");

    // Compile templates; a malformed template is fatal
    let templates = NotificationTemplates::compile(&settings.templates)
        .context("Failed to compile notification templates")?;
    tracing::info!(
        custom_labels_template = templates.has_labels_template(),
        "Templates compiled"
    );

    // Create ntfy client
    let client = NtfyClient::new(&settings.ntfy).context("Failed to create ntfy client")?;
    tracing::info!(url = %client.publish_url(), "ntfy client initialized");

    // Create application state
    let addr = settings.server_addr();
    let state = AppState::new(settings, templates, Arc::new(client));

    // Create Axum app
    let app = create_app(state);

    // Start server
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server listening on {}", addr);

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}
