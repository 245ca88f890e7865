//! # Licensing API
//!
//! The four operations the surrounding POS backend consumes:
//!
//! - `GET  /v1/license/status` — current license standing
//! - `POST /v1/license/increment-transaction` — the gate called before
//!   every sale is persisted; fails closed when the trial quota is out
//! - `POST /v1/license/activate` — serial-number activation
//! - `POST /v1/license/reset-trial` — support/test operation

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use tillgate_core::WarningLevel;
use tillgate_engine::{LicenseStatusReport, Remaining};

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

// ── Request/Response DTOs ───────────────────────────────────────────

/// Request to activate a serial number on this installation.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivateRequest {
    /// The license key, `TILL-YYYY-XXXXXX-CCCC`.
    pub serial_number: String,
    /// Free-form client machine description forwarded to the licensing
    /// server for its installation records.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub computer_info: serde_json::Value,
}

impl Validate for ActivateRequest {
    fn validate(&self) -> Result<(), String> {
        if self.serial_number.trim().is_empty() {
            return Err("serialNumber must not be empty".to_string());
        }
        Ok(())
    }
}

/// Current license standing.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// `trial`, `temporary`, or `activated`.
    pub status: String,
    pub total_transactions: u32,
    /// `"unlimited"` or the number of transactions left.
    #[schema(value_type = Object)]
    pub remaining: serde_json::Value,
    pub activated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hardware_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activation_date: Option<DateTime<Utc>>,
    pub temporary: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateTime<Utc>>,
}

impl From<LicenseStatusReport> for StatusResponse {
    fn from(report: LicenseStatusReport) -> Self {
        Self {
            status: report.status.as_str().to_string(),
            total_transactions: report.total_transactions,
            remaining: remaining_json(report.remaining),
            activated: report.activated,
            serial_number: report.serial_number,
            hardware_id: report.hardware_id,
            activation_date: report.activation_date,
            temporary: report.temporary,
            expires: report.expires,
        }
    }
}

/// Result of a transaction increment.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IncrementResponse {
    pub success: bool,
    pub total: u32,
    /// `"unlimited"` or the number of transactions left.
    #[schema(value_type = Object)]
    pub remaining: serde_json::Value,
    /// `none`, `medium`, `high`, or `critical`.
    pub warning: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Result of a successful activation.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivateResponse {
    pub success: bool,
    pub serial_number: String,
    pub hardware_id: String,
    /// License tier granted by the server or the offline table.
    #[serde(rename = "type")]
    pub license_type: String,
    pub temporary: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateTime<Utc>>,
    pub message: String,
}

/// Result of a trial reset.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetResponse {
    pub success: bool,
    pub message: String,
}

fn remaining_json(remaining: Remaining) -> serde_json::Value {
    match remaining {
        Remaining::Unlimited => serde_json::Value::String("unlimited".to_string()),
        Remaining::Count(n) => serde_json::Value::from(n),
    }
}

// ── Router ──────────────────────────────────────────────────────────

/// Build the licensing router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/license/status", get(get_status))
        .route(
            "/v1/license/increment-transaction",
            post(increment_transaction),
        )
        .route("/v1/license/activate", post(activate_license))
        .route("/v1/license/reset-trial", post(reset_trial))
}

// ── Handlers ────────────────────────────────────────────────────────

/// GET /v1/license/status — Current license standing.
#[utoipa::path(
    get,
    path = "/v1/license/status",
    responses(
        (status = 200, description = "Current license status", body = StatusResponse),
    ),
    tag = "license"
)]
async fn get_status(State(state): State<AppState>) -> Result<Json<StatusResponse>, AppError> {
    let report = state.engine.status().await?;
    Ok(Json(StatusResponse::from(report)))
}

/// POST /v1/license/increment-transaction — Record one sale against the
/// license gate. The transaction-creation endpoint calls this before
/// persisting; a `TRIAL_LIMIT_REACHED` conflict aborts the sale.
#[utoipa::path(
    post,
    path = "/v1/license/increment-transaction",
    responses(
        (status = 200, description = "Transaction recorded", body = IncrementResponse),
        (status = 409, description = "Trial limit reached", body = crate::error::ErrorBody),
    ),
    tag = "license"
)]
async fn increment_transaction(
    State(state): State<AppState>,
) -> Result<Json<IncrementResponse>, AppError> {
    let outcome = state.engine.increment_transaction().await?;
    let message = match (outcome.warning, outcome.remaining) {
        (WarningLevel::None, _) => None,
        (_, Remaining::Count(n)) => Some(format!(
            "{n} trial transaction(s) remaining — activate a license to continue without limits"
        )),
        (_, Remaining::Unlimited) => None,
    };
    Ok(Json(IncrementResponse {
        success: true,
        total: outcome.total,
        remaining: remaining_json(outcome.remaining),
        warning: outcome.warning.as_str().to_string(),
        status: outcome.status.as_str().to_string(),
        message,
    }))
}

/// POST /v1/license/activate — Activate a serial number.
#[utoipa::path(
    post,
    path = "/v1/license/activate",
    request_body = ActivateRequest,
    responses(
        (status = 200, description = "License activated", body = ActivateResponse),
        (status = 422, description = "Malformed serial", body = crate::error::ErrorBody),
        (status = 404, description = "Serial not found", body = crate::error::ErrorBody),
        (status = 409, description = "Installation limit reached", body = crate::error::ErrorBody),
        (status = 400, description = "Activation refused", body = crate::error::ErrorBody),
    ),
    tag = "license"
)]
async fn activate_license(
    State(state): State<AppState>,
    body: Result<Json<ActivateRequest>, JsonRejection>,
) -> Result<Json<ActivateResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let outcome = state
        .engine
        .activate_license(&req.serial_number, &req.computer_info)
        .await?;
    Ok(Json(ActivateResponse {
        success: true,
        serial_number: outcome.serial_number,
        hardware_id: outcome.hardware_id,
        license_type: outcome.license_type,
        temporary: outcome.temporary,
        expires: outcome.expires,
        message: outcome.message,
    }))
}

/// POST /v1/license/reset-trial — Clear the counter and activation
/// fields. Support/test operation; deployments enable the bearer token
/// to keep it privileged.
#[utoipa::path(
    post,
    path = "/v1/license/reset-trial",
    responses(
        (status = 200, description = "Trial state reset", body = ResetResponse),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorBody),
    ),
    tag = "license"
)]
async fn reset_trial(State(state): State<AppState>) -> Result<Json<ResetResponse>, AppError> {
    state.engine.reset_trial().await?;
    Ok(Json(ResetResponse {
        success: true,
        message: "trial counter reset to fresh state".to_string(),
    }))
}
