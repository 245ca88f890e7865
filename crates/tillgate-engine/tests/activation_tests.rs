//! Integration tests for the activation engine: the online validation
//! matrix against a wiremock server, the offline fallback, and the
//! trial increment state machine.

use chrono::{Duration, Utc};
use serde_json::json;
use tillgate_core::{serial_checksum, WarningLevel, TRIAL_LIMIT};
use tillgate_engine::{ActivationEngine, EffectiveStatus, EngineError, Remaining};
use tillgate_license_client::{LicenseServerClient, LicenseServerConfig};
use tillgate_store::{LicenseStore, PreloadedSerial};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Build a checksum-valid serial for a given body.
fn make_serial(body6: &str) -> String {
    let body = format!("TILL-2026-{body6}-");
    format!("{body}{}", serial_checksum(&body))
}

async fn offline_engine() -> ActivationEngine {
    let store = LicenseStore::in_memory().await.unwrap();
    ActivationEngine::new(store, None)
}

async fn online_engine(server: &MockServer) -> ActivationEngine {
    let store = LicenseStore::in_memory().await.unwrap();
    let config = LicenseServerConfig {
        base_url: server.uri().parse().unwrap(),
        timeout_secs: 5,
    };
    let client = LicenseServerClient::new(config).unwrap();
    ActivationEngine::new(store, Some(client))
}

/// Engine whose server URL points at a closed port.
async fn unreachable_engine() -> ActivationEngine {
    let store = LicenseStore::in_memory().await.unwrap();
    let config = LicenseServerConfig {
        base_url: "http://127.0.0.1:9".parse().unwrap(),
        timeout_secs: 2,
    };
    let client = LicenseServerClient::new(config).unwrap();
    ActivationEngine::new(store, Some(client))
}

// ── Format/checksum gates ────────────────────────────────────────────

#[tokio::test]
async fn malformed_serial_rejects_before_any_work() {
    let server = MockServer::start().await;
    // No request may reach the server for a malformed serial.
    Mock::given(method("POST"))
        .and(path("/api/v1/license/validate"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let engine = online_engine(&server).await;
    let err = engine
        .activate_license("not-a-serial", &json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidFormat));

    // No queue entry, no activation row, counter untouched.
    assert!(engine.store().pending_validations().await.unwrap().is_empty());
    assert!(engine.store().activation_log().await.unwrap().is_empty());
    let counter = engine.store().read_counter().await.unwrap();
    assert!(counter.serial_number.is_none());
}

#[tokio::test]
async fn bad_checksum_rejects_before_any_work() {
    let engine = offline_engine().await;
    let err = engine
        .activate_license("TILL-2026-ABC123-0000", &json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidChecksum));
    assert!(engine.store().pending_validations().await.unwrap().is_empty());
}

// ── Online validation matrix ─────────────────────────────────────────

#[tokio::test]
async fn online_existing_activation_succeeds_non_temporary() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/license/validate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "valid": true,
            "existing": true,
            "type": "professional"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let engine = online_engine(&server).await;
    let serial = make_serial("AAA111");
    let outcome = engine.activate_license(&serial, &json!({})).await.unwrap();

    assert!(!outcome.temporary);
    assert!(outcome.expires.is_none());
    assert_eq!(outcome.license_type, "professional");
    assert_eq!(outcome.serial_number, serial);

    let status = engine.status().await.unwrap();
    assert_eq!(status.status, EffectiveStatus::Activated);
    assert_eq!(status.remaining, Remaining::Unlimited);
    assert!(status.activated);
}

#[tokio::test]
async fn online_claim_flow_issues_second_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/license/validate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "valid": true,
            "canActivate": true,
            "type": "standard"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/license/activate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "slot claimed"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let engine = online_engine(&server).await;
    let outcome = engine
        .activate_license(&make_serial("BBB222"), &json!({}))
        .await
        .unwrap();

    assert!(!outcome.temporary);
    assert_eq!(outcome.message, "slot claimed");
    // Confirmed online grants leave no reconciliation debt.
    assert!(engine.store().pending_validations().await.unwrap().is_empty());
}

#[tokio::test]
async fn online_claim_conflict_maps_to_max_installations() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/license/validate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "valid": true,
            "canActivate": true
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/license/activate"))
        .respond_with(ResponseTemplate::new(409).set_body_string("no slots"))
        .mount(&server)
        .await;

    let engine = online_engine(&server).await;
    let err = engine
        .activate_license(&make_serial("CCC333"), &json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::MaxInstallationsReached { .. }));

    // An authoritative refusal never downgrades to an offline grant.
    assert!(engine.store().pending_validations().await.unwrap().is_empty());
    assert!(engine.store().activation_log().await.unwrap().is_empty());
}

#[tokio::test]
async fn online_refusal_with_installations_list_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/license/validate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "valid": false,
            "reason": "MAX_INSTALLATIONS_REACHED",
            "installations": [{"hardwareId": "fp-1"}, {"hardwareId": "fp-2"}, {"hardwareId": "fp-3"}]
        })))
        .mount(&server)
        .await;

    let engine = online_engine(&server).await;
    let err = engine
        .activate_license(&make_serial("DDD444"), &json!({}))
        .await
        .unwrap_err();
    match err {
        EngineError::MaxInstallationsReached { installations } => {
            assert_eq!(installations.len(), 3);
        }
        other => panic!("expected MaxInstallationsReached, got: {other:?}"),
    }
}

#[tokio::test]
async fn online_unknown_serial_refusal_maps_to_sn_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/license/validate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "valid": false,
            "reason": "SN_NOT_FOUND"
        })))
        .mount(&server)
        .await;

    let engine = online_engine(&server).await;
    let err = engine
        .activate_license(&make_serial("EEE555"), &json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::SerialNotFound));
}

#[tokio::test]
async fn online_generic_refusal_carries_server_reason() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/license/validate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "valid": false,
            "reason": "LICENSE_EXPIRED"
        })))
        .mount(&server)
        .await;

    let engine = online_engine(&server).await;
    let err = engine
        .activate_license(&make_serial("FFF666"), &json!({}))
        .await
        .unwrap_err();
    match err {
        EngineError::ActivationFailed { message } => assert_eq!(message, "LICENSE_EXPIRED"),
        other => panic!("expected ActivationFailed, got: {other:?}"),
    }
}

#[tokio::test]
async fn online_permissive_default_for_bare_valid_true() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/license/validate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"valid": true})))
        .mount(&server)
        .await;

    let engine = online_engine(&server).await;
    let outcome = engine
        .activate_license(&make_serial("GGG777"), &json!({}))
        .await
        .unwrap();
    assert!(!outcome.temporary);
    assert_eq!(outcome.license_type, "standard");
}

// ── Offline fallback ─────────────────────────────────────────────────

#[tokio::test]
async fn unreachable_server_falls_back_to_preloaded_table() {
    let engine = unreachable_engine().await;
    let serial = make_serial("HHH888");
    engine
        .store()
        .seed_preloaded(&PreloadedSerial {
            serial_number: serial.clone(),
            valid: true,
            max_installations: 1,
            license_type: "enterprise".to_string(),
            generated_date: None,
        })
        .await
        .unwrap();

    let outcome = engine.activate_license(&serial, &json!({})).await.unwrap();
    assert!(!outcome.temporary);
    assert_eq!(outcome.license_type, "enterprise");
    // Recognized serials do not enter the retry queue.
    assert!(engine.store().pending_validations().await.unwrap().is_empty());
}

#[tokio::test]
async fn unreachable_server_grants_grace_for_unknown_serial() {
    let engine = unreachable_engine().await;
    let serial = make_serial("JJJ999");

    let before = Utc::now();
    let outcome = engine.activate_license(&serial, &json!({})).await.unwrap();
    let after = Utc::now();

    assert!(outcome.temporary);
    let expires = outcome.expires.expect("grace grant carries an expiry");
    assert!(expires >= before + Duration::days(30));
    assert!(expires <= after + Duration::days(30));

    // Exactly one queue entry for the serial+hardware pair.
    let pending = engine.store().pending_validations().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].serial_number, serial);
    assert_eq!(pending[0].hardware_id, outcome.hardware_id);

    // Re-activating refreshes the entry rather than duplicating it.
    engine.activate_license(&serial, &json!({})).await.unwrap();
    assert_eq!(engine.store().pending_validations().await.unwrap().len(), 1);

    // During the grace window the license reports as temporary.
    let status = engine.status().await.unwrap();
    assert_eq!(status.status, EffectiveStatus::Temporary);
    assert_eq!(status.remaining, Remaining::Unlimited);
    assert!(status.temporary);
    assert!(!status.activated);
}

#[tokio::test]
async fn malformed_server_response_also_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/license/validate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
        .mount(&server)
        .await;

    let engine = online_engine(&server).await;
    let outcome = engine
        .activate_license(&make_serial("KKK000"), &json!({}))
        .await
        .unwrap();
    assert!(outcome.temporary);
    assert_eq!(engine.store().pending_validations().await.unwrap().len(), 1);
}

#[tokio::test]
async fn offline_only_engine_skips_the_network_entirely() {
    let engine = offline_engine().await;
    let outcome = engine
        .activate_license(&make_serial("LLL111"), &json!({}))
        .await
        .unwrap();
    assert!(outcome.temporary);
}

// ── Increment state machine ──────────────────────────────────────────

#[tokio::test]
async fn trial_increments_count_down_with_graduated_warnings() {
    let engine = offline_engine().await;

    for i in 1..=TRIAL_LIMIT {
        let outcome = engine.increment_transaction().await.unwrap();
        assert_eq!(outcome.total, i);
        let remaining = TRIAL_LIMIT - i;
        assert_eq!(outcome.remaining, Remaining::Count(remaining));
        let expected = match remaining {
            0..=4 => WarningLevel::Critical,
            5..=9 => WarningLevel::High,
            10..=19 => WarningLevel::Medium,
            _ => WarningLevel::None,
        };
        assert_eq!(outcome.warning, expected, "at remaining {remaining}");
    }

    // The 100th call fails closed without changing the counter.
    let err = engine.increment_transaction().await.unwrap_err();
    assert!(matches!(err, EngineError::TrialLimitReached { limit } if limit == TRIAL_LIMIT));
    let counter = engine.store().read_counter().await.unwrap();
    assert_eq!(counter.total_transactions, TRIAL_LIMIT);
}

#[tokio::test]
async fn increment_is_unlimited_after_activation() {
    let engine = offline_engine().await;
    engine
        .store()
        .record_activation(&make_serial("MMM222"), "fp", None)
        .await
        .unwrap();

    for _ in 0..(TRIAL_LIMIT + 10) {
        let outcome = engine.increment_transaction().await.unwrap();
        assert_eq!(outcome.remaining, Remaining::Unlimited);
        assert_eq!(outcome.status, EffectiveStatus::Activated);
        assert_eq!(outcome.warning, WarningLevel::None);
    }
}

#[tokio::test]
async fn increment_is_unlimited_during_grace_window() {
    let engine = offline_engine().await;
    engine
        .activate_license(&make_serial("NNN333"), &json!({}))
        .await
        .unwrap();

    for _ in 0..(TRIAL_LIMIT + 5) {
        let outcome = engine.increment_transaction().await.unwrap();
        assert_eq!(outcome.remaining, Remaining::Unlimited);
        assert_eq!(outcome.status, EffectiveStatus::Temporary);
    }
}

// ── Status & reset ───────────────────────────────────────────────────

#[tokio::test]
async fn fresh_install_reports_full_trial() {
    let engine = offline_engine().await;
    let status = engine.status().await.unwrap();
    assert_eq!(status.status, EffectiveStatus::Trial);
    assert_eq!(status.total_transactions, 0);
    assert_eq!(status.remaining, Remaining::Count(TRIAL_LIMIT));
    assert!(!status.activated);
    assert!(!status.temporary);
    assert!(status.serial_number.is_none());
}

#[tokio::test]
async fn reset_returns_to_fresh_trial() {
    let engine = offline_engine().await;
    for _ in 0..7 {
        engine.increment_transaction().await.unwrap();
    }
    engine
        .activate_license(&make_serial("PPP444"), &json!({}))
        .await
        .unwrap();

    engine.reset_trial().await.unwrap();

    let status = engine.status().await.unwrap();
    assert_eq!(status.status, EffectiveStatus::Trial);
    assert_eq!(status.total_transactions, 0);
    assert_eq!(status.remaining, Remaining::Count(TRIAL_LIMIT));
    assert!(status.serial_number.is_none());
    assert!(status.hardware_id.is_none());
    assert!(status.activation_date.is_none());
    assert!(status.expires.is_none());
}

#[tokio::test]
async fn activation_binds_the_hardware_fingerprint() {
    let engine = offline_engine().await;
    let outcome = engine
        .activate_license(&make_serial("QQQ555"), &json!({}))
        .await
        .unwrap();

    // Two-tier fingerprint shape: 16 hex chars, hyphen, 8 hex chars.
    let parts: Vec<&str> = outcome.hardware_id.split('-').collect();
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0].len(), 16);
    assert_eq!(parts[1].len(), 8);

    let status = engine.status().await.unwrap();
    assert_eq!(status.hardware_id.as_deref(), Some(outcome.hardware_id.as_str()));
}
