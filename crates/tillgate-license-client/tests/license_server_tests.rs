//! Contract tests for the licensing server client.
//!
//! wiremock simulates the authoritative server; every path and response
//! shape matches the client contract in §lib.rs.
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | POST | `/api/v1/license/validate` | `validate_*` |
//! | POST | `/api/v1/license/activate` | `activate_*` |

use serde_json::json;
use tillgate_license_client::{
    LicenseClientError, LicenseServerClient, LicenseServerConfig, ValidationRequest,
};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> LicenseServerClient {
    let config = LicenseServerConfig {
        base_url: server.uri().parse().unwrap(),
        timeout_secs: 5,
    };
    LicenseServerClient::new(config).unwrap()
}

fn request<'a>(computer_info: &'a serde_json::Value) -> ValidationRequest<'a> {
    ValidationRequest {
        serial_number: "TILL-2026-ABC123-DBD1",
        hardware_id: "aabbccdd11223344-55667788",
        computer_info,
    }
}

// ── POST /api/v1/license/validate ────────────────────────────────────

#[tokio::test]
async fn validate_sends_camel_case_payload() {
    let server = MockServer::start().await;
    let info = json!({"os": "linux", "posVersion": "4.2.0"});

    Mock::given(method("POST"))
        .and(path("/api/v1/license/validate"))
        .and(body_json(json!({
            "serialNumber": "TILL-2026-ABC123-DBD1",
            "hardwareId": "aabbccdd11223344-55667788",
            "computerInfo": {"os": "linux", "posVersion": "4.2.0"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "valid": true,
            "existing": true,
            "type": "professional"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = test_client(&server).validate(&request(&info)).await.unwrap();
    assert!(resp.valid);
    assert!(resp.existing);
    assert_eq!(resp.license_type.as_deref(), Some("professional"));
}

#[tokio::test]
async fn validate_surfaces_refusal_reason_and_installations() {
    let server = MockServer::start().await;
    let info = json!({});

    Mock::given(method("POST"))
        .and(path("/api/v1/license/validate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "valid": false,
            "reason": "MAX_INSTALLATIONS_REACHED",
            "installations": [
                {"hardwareId": "fp-1", "activatedAt": "2026-01-02T09:00:00Z"},
                {"hardwareId": "fp-2", "activatedAt": "2026-02-11T16:30:00Z"}
            ]
        })))
        .mount(&server)
        .await;

    let resp = test_client(&server).validate(&request(&info)).await.unwrap();
    assert!(!resp.valid);
    assert_eq!(resp.reason.as_deref(), Some("MAX_INSTALLATIONS_REACHED"));
    assert_eq!(resp.installations.as_ref().unwrap().len(), 2);
}

#[tokio::test]
async fn validate_maps_server_error_to_api_error() {
    let server = MockServer::start().await;
    let info = json!({});

    Mock::given(method("POST"))
        .and(path("/api/v1/license/validate"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let result = test_client(&server).validate(&request(&info)).await;
    match result.unwrap_err() {
        LicenseClientError::Api { status, .. } => {
            assert_eq!(status, 500);
        }
        other => panic!("expected Api, got: {other:?}"),
    }
}

#[tokio::test]
async fn validate_maps_malformed_body_to_deserialization_error() {
    let server = MockServer::start().await;
    let info = json!({});

    Mock::given(method("POST"))
        .and(path("/api/v1/license/validate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let result = test_client(&server).validate(&request(&info)).await;
    let err = result.unwrap_err();
    assert!(matches!(err, LicenseClientError::Deserialization { .. }));
    assert!(err.is_transport());
}

#[tokio::test]
async fn validate_maps_unreachable_server_to_http_error() {
    // Nothing is listening on this port.
    let config = LicenseServerConfig {
        base_url: "http://127.0.0.1:9".parse().unwrap(),
        timeout_secs: 2,
    };
    let client = LicenseServerClient::new(config).unwrap();
    let info = json!({});

    let result = client.validate(&request(&info)).await;
    let err = result.unwrap_err();
    assert!(matches!(err, LicenseClientError::Http { .. }));
    assert!(err.is_transport());
}

// ── POST /api/v1/license/activate ────────────────────────────────────

#[tokio::test]
async fn activate_returns_success_body() {
    let server = MockServer::start().await;
    let info = json!({});

    Mock::given(method("POST"))
        .and(path("/api/v1/license/activate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "activation recorded"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = test_client(&server).activate(&request(&info)).await.unwrap();
    assert!(resp.success);
    assert_eq!(resp.message.as_deref(), Some("activation recorded"));
}

#[tokio::test]
async fn activate_maps_409_to_slot_exhausted() {
    let server = MockServer::start().await;
    let info = json!({});

    Mock::given(method("POST"))
        .and(path("/api/v1/license/activate"))
        .respond_with(
            ResponseTemplate::new(409).set_body_string(r#"{"error":"no slots remaining"}"#),
        )
        .mount(&server)
        .await;

    let result = test_client(&server).activate(&request(&info)).await;
    match result.unwrap_err() {
        err @ LicenseClientError::SlotExhausted { .. } => {
            assert!(!err.is_transport());
        }
        other => panic!("expected SlotExhausted, got: {other:?}"),
    }
}

#[tokio::test]
async fn activate_maps_other_failures_to_api_error() {
    let server = MockServer::start().await;
    let info = json!({});

    Mock::given(method("POST"))
        .and(path("/api/v1/license/activate"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let result = test_client(&server).activate(&request(&info)).await;
    match result.unwrap_err() {
        err @ LicenseClientError::Api { .. } => {
            assert!(err.is_transport());
        }
        other => panic!("expected Api, got: {other:?}"),
    }
}
