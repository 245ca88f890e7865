//! Engine error type — one variant per rejection in the activation
//! taxonomy, plus storage faults.

use thiserror::Error;

use tillgate_core::ActivationErrorKind;

/// Errors from licensing operations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Serial does not match the structural format. Raised before any
    /// fingerprint or I/O work.
    #[error("serial number format is invalid")]
    InvalidFormat,

    /// Serial structure is fine but the checksum segment is wrong.
    #[error("serial number checksum does not match")]
    InvalidChecksum,

    /// The authoritative server does not know this serial.
    #[error("serial number not found")]
    SerialNotFound,

    /// Every installation slot for the serial is consumed. Carries the
    /// existing installations when the server supplied them, so the
    /// caller can show where the license is already in use.
    #[error("license already activated on {} machine(s)", installations.len())]
    MaxInstallationsReached {
        installations: Vec<serde_json::Value>,
    },

    /// The trial transaction quota is exhausted. An expected steady-state
    /// condition, not a system fault.
    #[error("trial limit of {limit} transactions reached")]
    TrialLimitReached { limit: u32 },

    /// Any other validation refusal, with the server- or offline-supplied
    /// message.
    #[error("activation failed: {message}")]
    ActivationFailed { message: String },

    /// Local persistence failure. Fatal for the current operation; no
    /// partial state was written.
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl EngineError {
    /// The machine-readable code the API layer surfaces for this error.
    pub fn kind(&self) -> ActivationErrorKind {
        match self {
            Self::InvalidFormat => ActivationErrorKind::InvalidFormat,
            Self::InvalidChecksum => ActivationErrorKind::InvalidChecksum,
            Self::SerialNotFound => ActivationErrorKind::SnNotFound,
            Self::MaxInstallationsReached { .. } => ActivationErrorKind::MaxInstallationsReached,
            Self::TrialLimitReached { .. } => ActivationErrorKind::TrialLimitReached,
            Self::ActivationFailed { .. } | Self::Storage(_) => {
                ActivationErrorKind::ActivationFailed
            }
        }
    }
}
