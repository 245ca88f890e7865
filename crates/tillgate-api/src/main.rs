//! # tillgate-api — Binary Entry Point
//!
//! Starts the Axum HTTP server for the Tillgate licensing subsystem.
//! Binds to a configurable port (default 8080).

use tillgate_api::state::{AppConfig, AppState};
use tillgate_engine::ActivationEngine;
use tillgate_license_client::{LicenseServerClient, LicenseServerConfig};
use tillgate_store::LicenseStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Build configuration from environment.
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let auth_token = std::env::var("AUTH_TOKEN").ok();
    let config = AppConfig { port, auth_token };

    // Open the embedded license database; schema bootstrap is idempotent
    // and runs on every startup.
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://tillgate.db".to_string());
    let store = LicenseStore::connect(&database_url).await.map_err(|e| {
        tracing::error!("license database initialization failed: {e}");
        e
    })?;

    // Attempt to create the licensing server client from environment.
    let client = match LicenseServerConfig::from_env() {
        Ok(server_config) => {
            tracing::info!(base_url = %server_config.base_url, "licensing server client configured");
            Some(LicenseServerClient::new(server_config)?)
        }
        Err(e) => {
            tracing::warn!(
                "licensing server not configured: {e}. Activations will validate offline."
            );
            None
        }
    };

    let engine = ActivationEngine::new(store, client);
    let state = AppState { engine, config };
    let app = tillgate_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Tillgate licensing API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
