//! # Serial Number Codec
//!
//! Structural and checksum validation for Tillgate license keys.
//!
//! ## Format
//!
//! ```text
//! TILL-YYYY-XXXXXX-CCCC
//! ```
//!
//! - `TILL` — fixed product prefix
//! - `YYYY` — four digits (issue year)
//! - `XXXXXX` — six uppercase alphanumerics
//! - `CCCC` — checksum: the first 4 uppercase hex characters of the MD5
//!   digest of `TILL-YYYY-XXXXXX-` (trailing hyphen included, checksum
//!   segment excluded)
//!
//! Both checks are pure and deterministic. Callers must run the format
//! check before the checksum check so malformed input short-circuits
//! before any digest work.

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed literal prefix of every Tillgate serial number.
pub const SERIAL_PREFIX: &str = "TILL";

/// Errors from [`SerialNumber::parse`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialParseError {
    /// The string does not match `TILL-YYYY-XXXXXX-CCCC`.
    #[error("serial number does not match the TILL-YYYY-XXXXXX-CCCC format")]
    InvalidFormat,

    /// The checksum segment does not match the recomputed digest.
    #[error("serial number checksum segment does not match")]
    InvalidChecksum,
}

/// A license key that has passed both the format and checksum checks.
///
/// Construction via [`SerialNumber::parse`] is the only way to obtain a
/// value of this type, so holders can rely on its validity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SerialNumber(String);

impl SerialNumber {
    /// Validate a raw string and wrap it.
    ///
    /// Runs the format check first, then the checksum check, matching the
    /// rejection order the activation protocol requires.
    pub fn parse(raw: &str) -> Result<Self, SerialParseError> {
        if !is_valid_format(raw) {
            return Err(SerialParseError::InvalidFormat);
        }
        if !is_valid_checksum(raw) {
            return Err(SerialParseError::InvalidChecksum);
        }
        Ok(Self(raw.to_string()))
    }

    /// Access the validated serial string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strict structural check: `TILL-YYYY-XXXXXX-CCCC`.
///
/// Any deviation rejects — wrong segment count, wrong segment length,
/// lowercase letters, non-hex checksum characters.
pub fn is_valid_format(serial: &str) -> bool {
    let segments: Vec<&str> = serial.split('-').collect();
    if segments.len() != 4 {
        return false;
    }
    segments[0] == SERIAL_PREFIX
        && segments[1].len() == 4
        && segments[1].bytes().all(|b| b.is_ascii_digit())
        && segments[2].len() == 6
        && segments[2]
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        && segments[3].len() == 4
        && segments[3]
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b))
}

/// Recompute the checksum segment and compare case-sensitively.
///
/// Malformed input (wrong segment count) returns `false` rather than
/// panicking, so this is safe to call on arbitrary strings.
pub fn is_valid_checksum(serial: &str) -> bool {
    let segments: Vec<&str> = serial.split('-').collect();
    if segments.len() != 4 {
        return false;
    }
    let body = format!("{}-{}-{}-", segments[0], segments[1], segments[2]);
    serial_checksum(&body) == segments[3]
}

/// First 4 uppercase hex characters of the MD5 digest of `body`.
///
/// `body` is the serial up to and including the third hyphen, e.g.
/// `TILL-2026-ABC123-`. Exposed so that key generators and tests can
/// produce valid serials.
pub fn serial_checksum(body: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(body.as_bytes());
    let digest = hasher.finalize();
    let hex: String = digest.iter().map(|b| format!("{b:02X}")).collect();
    hex[..4].to_string()
}
