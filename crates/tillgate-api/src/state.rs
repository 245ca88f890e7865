//! Application state shared across handlers.

use tillgate_engine::ActivationEngine;

/// Server configuration assembled from the environment.
#[derive(Clone)]
pub struct AppConfig {
    /// Listen port.
    pub port: u16,
    /// Bearer token guarding the licensing endpoints. `None` disables
    /// auth (development / single-tenant mode).
    pub auth_token: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Shared application state. Cheap to clone; the engine's store pool and
/// HTTP client are internally shared.
#[derive(Clone)]
pub struct AppState {
    pub engine: ActivationEngine,
    pub config: AppConfig,
}
