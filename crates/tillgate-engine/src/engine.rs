//! The activation engine: orchestration over the store, the fingerprint
//! generator, and the licensing server client.

use chrono::{Duration, Utc};

use tillgate_core::{serial, LicenseStatus, WarningLevel, OFFLINE_GRACE_DAYS, TRIAL_LIMIT};
use tillgate_hwid::Fingerprinter;
use tillgate_license_client::{LicenseClientError, LicenseServerClient, ValidationRequest};
use tillgate_store::LicenseStore;

use crate::error::EngineError;
use crate::report::{
    derive_standing, ActivationOutcome, EffectiveStatus, IncrementOutcome, LicenseStatusReport,
    Remaining,
};

/// A fully determined validation outcome, ready to persist.
#[derive(Debug)]
struct Verdict {
    license_type: String,
    temporary: bool,
    expires: Option<chrono::DateTime<Utc>>,
    message: String,
}

/// Outcome of the online validation attempt.
enum OnlineAttempt {
    /// The server granted the activation.
    Granted(Verdict),
    /// Authoritative refusal — surfaced to the caller, never retried
    /// offline.
    Refused(EngineError),
    /// Transport-category failure — fall through to offline validation.
    Unreachable,
}

/// Activation protocol engine.
///
/// `client` is `None` in offline-only deployments; every activation then
/// takes the offline path directly.
#[derive(Debug, Clone)]
pub struct ActivationEngine {
    store: LicenseStore,
    client: Option<LicenseServerClient>,
    fingerprinter: Fingerprinter,
}

impl ActivationEngine {
    /// Assemble an engine over a store and an optional server client.
    pub fn new(store: LicenseStore, client: Option<LicenseServerClient>) -> Self {
        Self {
            store,
            client,
            fingerprinter: Fingerprinter::new(),
        }
    }

    /// Access the underlying store (support tooling, tests).
    pub fn store(&self) -> &LicenseStore {
        &self.store
    }

    /// Current license status, derived fresh from the store.
    pub async fn status(&self) -> Result<LicenseStatusReport, EngineError> {
        let counter = self.store.read_counter().await?;
        let in_grace = counter.in_grace_period(Utc::now());
        let (status, remaining) = derive_standing(
            counter.license_status,
            counter.total_transactions,
            in_grace,
            TRIAL_LIMIT,
        );
        Ok(LicenseStatusReport {
            status,
            total_transactions: counter.total_transactions,
            remaining,
            activated: counter.license_status == LicenseStatus::Activated,
            serial_number: counter.serial_number,
            hardware_id: counter.hardware_id,
            activation_date: counter.activation_date,
            temporary: status == EffectiveStatus::Temporary,
            expires: counter.temporary_until,
        })
    }

    /// Record one transaction against the license gate.
    ///
    /// This is the call the transaction-creation endpoint must make
    /// before persisting a sale. Fails closed with
    /// [`EngineError::TrialLimitReached`] when the quota is exhausted —
    /// the counter is left unchanged and the caller aborts the sale.
    pub async fn increment_transaction(&self) -> Result<IncrementOutcome, EngineError> {
        let Some(counter) = self.store.increment(TRIAL_LIMIT).await? else {
            return Err(EngineError::TrialLimitReached { limit: TRIAL_LIMIT });
        };

        let in_grace = counter.in_grace_period(Utc::now());
        let (status, remaining) = derive_standing(
            counter.license_status,
            counter.total_transactions,
            in_grace,
            TRIAL_LIMIT,
        );
        let warning = match remaining {
            Remaining::Unlimited => WarningLevel::None,
            Remaining::Count(n) => WarningLevel::for_remaining(n),
        };
        Ok(IncrementOutcome {
            total: counter.total_transactions,
            remaining,
            warning,
            status,
        })
    }

    /// Activate a serial number against this machine.
    ///
    /// Rejection order: format, checksum, then validation. The format
    /// and checksum gates run before the fingerprint is computed and
    /// before any network or disk work.
    pub async fn activate_license(
        &self,
        serial_number: &str,
        computer_info: &serde_json::Value,
    ) -> Result<ActivationOutcome, EngineError> {
        if !serial::is_valid_format(serial_number) {
            return Err(EngineError::InvalidFormat);
        }
        if !serial::is_valid_checksum(serial_number) {
            return Err(EngineError::InvalidChecksum);
        }

        let hardware_id = self.fingerprinter.generate().await;

        let verdict = match &self.client {
            Some(client) => {
                match self
                    .validate_online(client, serial_number, &hardware_id, computer_info)
                    .await
                {
                    OnlineAttempt::Granted(verdict) => verdict,
                    OnlineAttempt::Refused(err) => return Err(err),
                    OnlineAttempt::Unreachable => {
                        self.validate_offline(serial_number, &hardware_id).await?
                    }
                }
            }
            None => self.validate_offline(serial_number, &hardware_id).await?,
        };

        // State is written only now, with the outcome fully determined.
        self.store
            .record_activation(serial_number, &hardware_id, verdict.expires)
            .await?;

        tracing::info!(
            serial_number,
            temporary = verdict.temporary,
            license_type = %verdict.license_type,
            "license activated"
        );
        Ok(ActivationOutcome {
            serial_number: serial_number.to_string(),
            hardware_id,
            license_type: verdict.license_type,
            temporary: verdict.temporary,
            expires: verdict.expires,
            message: verdict.message,
        })
    }

    /// Clear the counter and all activation fields, reverting to a fresh
    /// trial. Support/test operation — the API layer gates it behind
    /// privileged access.
    pub async fn reset_trial(&self) -> Result<(), EngineError> {
        self.store.reset().await?;
        tracing::info!("trial counter reset");
        Ok(())
    }

    async fn validate_online(
        &self,
        client: &LicenseServerClient,
        serial_number: &str,
        hardware_id: &str,
        computer_info: &serde_json::Value,
    ) -> OnlineAttempt {
        let request = ValidationRequest {
            serial_number,
            hardware_id,
            computer_info,
        };

        let resp = match client.validate(&request).await {
            Ok(resp) => resp,
            Err(err) => {
                // ANY online failure falls through to offline validation,
                // not just connect errors. Deliberately broad.
                tracing::warn!(
                    error = %err,
                    "online validation failed; falling back to offline validation"
                );
                return OnlineAttempt::Unreachable;
            }
        };

        if !resp.valid {
            return OnlineAttempt::Refused(match resp.reason.as_deref() {
                Some("MAX_INSTALLATIONS_REACHED") => EngineError::MaxInstallationsReached {
                    installations: resp.installations.unwrap_or_default(),
                },
                Some("SN_NOT_FOUND") => EngineError::SerialNotFound,
                other => EngineError::ActivationFailed {
                    message: other
                        .map(str::to_string)
                        .or(resp.message)
                        .unwrap_or_else(|| "license validation refused".to_string()),
                },
            });
        }

        let license_type = resp
            .license_type
            .unwrap_or_else(|| "standard".to_string());

        if resp.existing {
            return OnlineAttempt::Granted(Verdict {
                license_type,
                temporary: false,
                expires: None,
                message: "license already activated on this hardware".to_string(),
            });
        }

        if resp.can_activate {
            return match client.activate(&request).await {
                Ok(claim) if claim.success => OnlineAttempt::Granted(Verdict {
                    license_type,
                    temporary: false,
                    expires: None,
                    message: claim
                        .message
                        .unwrap_or_else(|| "license activated".to_string()),
                }),
                Ok(claim) => OnlineAttempt::Refused(EngineError::ActivationFailed {
                    message: claim
                        .message
                        .unwrap_or_else(|| "activation was not accepted".to_string()),
                }),
                Err(LicenseClientError::SlotExhausted { .. }) => {
                    OnlineAttempt::Refused(EngineError::MaxInstallationsReached {
                        installations: Vec::new(),
                    })
                }
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        "activation claim failed; falling back to offline validation"
                    );
                    OnlineAttempt::Unreachable
                }
            };
        }

        // Permissive default: any other valid=true shape is a success.
        OnlineAttempt::Granted(Verdict {
            license_type,
            temporary: false,
            expires: None,
            message: resp
                .message
                .unwrap_or_else(|| "license validated".to_string()),
        })
    }

    async fn validate_offline(
        &self,
        serial_number: &str,
        hardware_id: &str,
    ) -> Result<Verdict, EngineError> {
        match self.store.lookup_preloaded(serial_number).await? {
            Some(entry) if entry.valid => Ok(Verdict {
                license_type: entry.license_type,
                temporary: false,
                expires: None,
                message: "offline activation accepted; validation will sync with the licensing server"
                    .to_string(),
            }),
            _ => {
                // Unknown serial: provisional trust. Queue it for the
                // reconciliation worker and grant the grace window.
                self.store
                    .enqueue_validation(serial_number, hardware_id)
                    .await?;
                let expires = Utc::now() + Duration::days(OFFLINE_GRACE_DAYS);
                tracing::info!(
                    serial_number,
                    %expires,
                    "unrecognized serial accepted provisionally; queued for reconciliation"
                );
                Ok(Verdict {
                    license_type: "temporary".to_string(),
                    temporary: true,
                    expires: Some(expires),
                    message: "offline activation granted provisionally pending server validation"
                        .to_string(),
                })
            }
        }
    }
}
