//! # Activation Error Taxonomy
//!
//! Machine-readable rejection codes shared by the engine and the API
//! layer. Every failed activation or increment maps to exactly one of
//! these kinds; the HTTP layer derives status codes and response bodies
//! from them without re-interpreting messages.

use serde::{Deserialize, Serialize};

/// Machine-readable code for a rejected licensing operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivationErrorKind {
    /// Serial does not match the structural format.
    InvalidFormat,
    /// Serial structure is fine but the checksum segment is wrong.
    InvalidChecksum,
    /// The authoritative server does not know this serial.
    SnNotFound,
    /// The serial has consumed all its installation slots.
    MaxInstallationsReached,
    /// Any other validation failure (server refusal, storage fault).
    ActivationFailed,
    /// The trial transaction quota is exhausted.
    TrialLimitReached,
}

impl ActivationErrorKind {
    /// The wire representation, also used as the API error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidFormat => "INVALID_FORMAT",
            Self::InvalidChecksum => "INVALID_CHECKSUM",
            Self::SnNotFound => "SN_NOT_FOUND",
            Self::MaxInstallationsReached => "MAX_INSTALLATIONS_REACHED",
            Self::ActivationFailed => "ACTIVATION_FAILED",
            Self::TrialLimitReached => "TRIAL_LIMIT_REACHED",
        }
    }
}

impl std::fmt::Display for ActivationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_form_matches_serde_form() {
        for kind in [
            ActivationErrorKind::InvalidFormat,
            ActivationErrorKind::InvalidChecksum,
            ActivationErrorKind::SnNotFound,
            ActivationErrorKind::MaxInstallationsReached,
            ActivationErrorKind::ActivationFailed,
            ActivationErrorKind::TrialLimitReached,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }
}
