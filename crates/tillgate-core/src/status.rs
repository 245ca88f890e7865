//! # License Status & Trial Policy
//!
//! The two-state license machine (`trial` / `activated`), the graduated
//! trial warning levels, and the policy constants shared by the store,
//! engine, and API layers.

use serde::{Deserialize, Serialize};

/// Number of transactions permitted before activation is required.
pub const TRIAL_LIMIT: u32 = 99;

/// Days of provisional access granted to an offline-accepted serial that
/// is not in the preloaded reference table. Pending reconciliation, any
/// checksum-valid unlisted serial gets this grace window — an intentional
/// availability-over-consistency tradeoff.
pub const OFFLINE_GRACE_DAYS: i64 = 30;

/// Persistent license state of an installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseStatus {
    /// Unactivated; transactions are counted against [`TRIAL_LIMIT`].
    Trial,
    /// Bound to a serial number; unlimited transactions.
    Activated,
}

impl LicenseStatus {
    /// The string stored in the database and returned over the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trial => "trial",
            Self::Activated => "activated",
        }
    }

    /// Parse the stored string form. Returns `None` for unknown values.
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "trial" => Some(Self::Trial),
            "activated" => Some(Self::Activated),
            _ => None,
        }
    }
}

impl std::fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Graduated warning attached to trial increments as the quota runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningLevel {
    /// More than 19 transactions remaining.
    None,
    /// 19 or fewer remaining.
    Medium,
    /// 9 or fewer remaining.
    High,
    /// 4 or fewer remaining.
    Critical,
}

impl WarningLevel {
    /// Compute the warning level for a remaining-transaction count.
    pub fn for_remaining(remaining: u32) -> Self {
        match remaining {
            0..=4 => Self::Critical,
            5..=9 => Self::High,
            10..=19 => Self::Medium,
            _ => Self::None,
        }
    }

    /// The string returned over the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for WarningLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
