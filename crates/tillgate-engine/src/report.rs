//! Operation result types returned by the engine to the API layer.

use chrono::{DateTime, Utc};
use serde::Serialize;

use tillgate_core::{LicenseStatus, WarningLevel};

/// Effective license standing derived at read time from the stored row.
///
/// `Temporary` is not persisted as a status — it is `trial` plus a
/// still-valid grace expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectiveStatus {
    Trial,
    Temporary,
    Activated,
}

impl EffectiveStatus {
    /// The string returned over the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trial => "trial",
            Self::Temporary => "temporary",
            Self::Activated => "activated",
        }
    }
}

impl std::fmt::Display for EffectiveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transactions remaining before the gate closes.
///
/// Serializes as the string `"unlimited"` or a number, matching the
/// wire contract of the status and increment responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remaining {
    Unlimited,
    Count(u32),
}

impl Serialize for Remaining {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Unlimited => serializer.serialize_str("unlimited"),
            Self::Count(n) => serializer.serialize_u32(*n),
        }
    }
}

/// Current license status as reported to callers.
#[derive(Debug, Clone, Serialize)]
pub struct LicenseStatusReport {
    pub status: EffectiveStatus,
    pub total_transactions: u32,
    pub remaining: Remaining,
    /// Whether the stored status is `activated` (a confirmed grant).
    pub activated: bool,
    pub serial_number: Option<String>,
    pub hardware_id: Option<String>,
    pub activation_date: Option<DateTime<Utc>>,
    /// Whether a grace-period grant is currently in effect.
    pub temporary: bool,
    pub expires: Option<DateTime<Utc>>,
}

/// Result of a successful transaction increment.
#[derive(Debug, Clone, Serialize)]
pub struct IncrementOutcome {
    pub total: u32,
    pub remaining: Remaining,
    pub warning: WarningLevel,
    pub status: EffectiveStatus,
}

/// Result of a successful activation.
#[derive(Debug, Clone, Serialize)]
pub struct ActivationOutcome {
    pub serial_number: String,
    pub hardware_id: String,
    pub license_type: String,
    pub temporary: bool,
    pub expires: Option<DateTime<Utc>>,
    pub message: String,
}

/// Derive the effective status and remaining quota from raw row facts.
pub(crate) fn derive_standing(
    status: LicenseStatus,
    total: u32,
    in_grace: bool,
    trial_limit: u32,
) -> (EffectiveStatus, Remaining) {
    match status {
        LicenseStatus::Activated => (EffectiveStatus::Activated, Remaining::Unlimited),
        LicenseStatus::Trial if in_grace => (EffectiveStatus::Temporary, Remaining::Unlimited),
        LicenseStatus::Trial => (
            EffectiveStatus::Trial,
            Remaining::Count(trial_limit.saturating_sub(total)),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_serializes_as_string_or_number() {
        assert_eq!(
            serde_json::to_string(&Remaining::Unlimited).unwrap(),
            "\"unlimited\""
        );
        assert_eq!(serde_json::to_string(&Remaining::Count(42)).unwrap(), "42");
    }

    #[test]
    fn standing_for_activated_is_unlimited() {
        let (status, remaining) = derive_standing(LicenseStatus::Activated, 500, false, 99);
        assert_eq!(status, EffectiveStatus::Activated);
        assert_eq!(remaining, Remaining::Unlimited);
    }

    #[test]
    fn standing_for_valid_grace_is_temporary_unlimited() {
        let (status, remaining) = derive_standing(LicenseStatus::Trial, 120, true, 99);
        assert_eq!(status, EffectiveStatus::Temporary);
        assert_eq!(remaining, Remaining::Unlimited);
    }

    #[test]
    fn standing_for_trial_counts_down_and_floors_at_zero() {
        let (status, remaining) = derive_standing(LicenseStatus::Trial, 40, false, 99);
        assert_eq!(status, EffectiveStatus::Trial);
        assert_eq!(remaining, Remaining::Count(59));

        let (_, remaining) = derive_standing(LicenseStatus::Trial, 150, false, 99);
        assert_eq!(remaining, Remaining::Count(0));
    }
}
