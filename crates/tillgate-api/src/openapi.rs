//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the licensing API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tillgate Licensing API",
        version = "0.6.3",
        description = "Trial gating and serial-number activation for the Tillgate POS backend.",
        license(name = "BUSL-1.1")
    ),
    paths(
        crate::routes::license::get_status,
        crate::routes::license::increment_transaction,
        crate::routes::license::activate_license,
        crate::routes::license::reset_trial,
    ),
    components(schemas(
        crate::routes::license::ActivateRequest,
        crate::routes::license::StatusResponse,
        crate::routes::license::IncrementResponse,
        crate::routes::license::ActivateResponse,
        crate::routes::license::ResetResponse,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "license", description = "Trial counter and serial activation"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
