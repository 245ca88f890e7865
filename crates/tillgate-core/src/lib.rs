#![deny(missing_docs)]

//! # tillgate-core — Foundational Types for Tillgate
//!
//! This crate defines the types every other crate in the workspace depends
//! on. It has no internal crate dependencies — only `serde`, `thiserror`,
//! `chrono`, and `md-5` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **[`SerialNumber`] is validated at construction.** A value of that
//!    type has already passed the format and checksum checks; downstream
//!    code never re-validates.
//!
//! 2. **Single [`ActivationErrorKind`] enum.** One definition of the
//!    machine-readable rejection codes, exhaustive `match` everywhere.
//!    The API layer and the engine cannot drift apart on error codes.
//!
//! 3. **Trial policy constants live here.** [`TRIAL_LIMIT`] and
//!    [`OFFLINE_GRACE_DAYS`] have exactly one definition.

pub mod error;
pub mod serial;
pub mod status;

// Re-export primary types at crate root for ergonomic imports.
pub use error::ActivationErrorKind;
pub use serial::{serial_checksum, SerialNumber, SerialParseError, SERIAL_PREFIX};
pub use status::{LicenseStatus, WarningLevel, OFFLINE_GRACE_DAYS, TRIAL_LIMIT};
