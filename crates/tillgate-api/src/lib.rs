//! # tillgate-api — Axum HTTP Surface for Tillgate
//!
//! The licensing subsystem's inbound API, consumed by the surrounding
//! POS backend.
//!
//! ## API Surface
//!
//! | Route | Operation |
//! |-------|-----------|
//! | `GET  /v1/license/status` | Current license standing |
//! | `POST /v1/license/increment-transaction` | Trial-gated sale counter |
//! | `POST /v1/license/activate` | Serial activation |
//! | `POST /v1/license/reset-trial` | Support/test reset |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → AuthMiddleware → Handler
//! ```
//!
//! Health probes (`/health/*`) are mounted outside the auth middleware
//! so orchestrators can reach them without credentials.

pub mod auth;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::middleware::from_fn;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::AuthConfig;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.config.auth_token.clone(),
    };

    // Authenticated licensing routes.
    let api = Router::new()
        .merge(routes::license::router())
        .merge(openapi::router())
        .layer(from_fn(auth::auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::Extension(auth_config))
        .with_state(state);

    // Unauthenticated health probes.
    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}
