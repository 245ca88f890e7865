//! Wire types for the licensing server API.
//!
//! Response fields use `#[serde(default)]` for resilience against server
//! schema evolution — the server may add fields or omit optional ones,
//! and `serde(deny_unknown_fields)` is intentionally NOT used.

use serde::{Deserialize, Serialize};

/// Request body shared by the validate and activate endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRequest<'a> {
    pub serial_number: &'a str,
    pub hardware_id: &'a str,
    /// Free-form client machine description forwarded for the server's
    /// installation records.
    pub computer_info: &'a serde_json::Value,
}

/// Response from `POST /api/v1/license/validate`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    /// Whether the serial is valid at all.
    #[serde(default)]
    pub valid: bool,
    /// The serial is already activated on this hardware.
    #[serde(default)]
    pub existing: bool,
    /// The serial is valid and a slot can be claimed.
    #[serde(default)]
    pub can_activate: bool,
    /// License tier granted by the server.
    #[serde(default, rename = "type")]
    pub license_type: Option<String>,
    /// Refusal reason when `valid` is false (e.g.
    /// `MAX_INSTALLATIONS_REACHED`, `SN_NOT_FOUND`).
    #[serde(default)]
    pub reason: Option<String>,
    /// Existing installations, supplied with installation-limit refusals.
    #[serde(default)]
    pub installations: Option<Vec<serde_json::Value>>,
    /// Human-readable server message.
    #[serde(default)]
    pub message: Option<String>,
}

/// Response from `POST /api/v1/license/activate`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivateResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_to_camel_case() {
        let info = serde_json::json!({"os": "linux"});
        let req = ValidationRequest {
            serial_number: "TILL-2026-ABC123-DBD1",
            hardware_id: "aabb-ccdd",
            computer_info: &info,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["serialNumber"], "TILL-2026-ABC123-DBD1");
        assert_eq!(json["hardwareId"], "aabb-ccdd");
        assert_eq!(json["computerInfo"]["os"], "linux");
    }

    #[test]
    fn validate_response_tolerates_minimal_body() {
        let resp: ValidateResponse = serde_json::from_str("{\"valid\":true}").unwrap();
        assert!(resp.valid);
        assert!(!resp.existing);
        assert!(!resp.can_activate);
        assert!(resp.license_type.is_none());
        assert!(resp.installations.is_none());
    }

    #[test]
    fn validate_response_tolerates_unknown_fields() {
        let resp: ValidateResponse = serde_json::from_str(
            "{\"valid\":false,\"reason\":\"SN_NOT_FOUND\",\"futureField\":42}",
        )
        .unwrap();
        assert!(!resp.valid);
        assert_eq!(resp.reason.as_deref(), Some("SN_NOT_FOUND"));
    }

    #[test]
    fn validate_response_reads_type_field() {
        let resp: ValidateResponse =
            serde_json::from_str("{\"valid\":true,\"existing\":true,\"type\":\"professional\"}")
                .unwrap();
        assert_eq!(resp.license_type.as_deref(), Some("professional"));
    }
}
