//! # tillgate-engine — Activation Protocol Engine
//!
//! Orchestrates the licensing operations the surrounding API layer
//! consumes: status reporting, the trial-gated transaction increment,
//! serial activation, and the trial reset.
//!
//! ## Validation order
//!
//! Activation rejects malformed serials before any fingerprint, network,
//! or disk work. Well-formed serials are validated online first; on ANY
//! online failure — connect error, timeout, non-2xx, undecodable body —
//! validation falls back to the offline path. The breadth of that
//! trigger is deliberate and preserved from the original protocol; it
//! trades strictness for availability and is worth product review
//! before narrowing.
//!
//! ## Offline grace
//!
//! A well-formed serial the offline reference table does not recognize
//! is provisionally trusted for [`tillgate_core::OFFLINE_GRACE_DAYS`]
//! days: a retry-queue entry is recorded for later reconciliation and a
//! temporary grant is issued. This is an intentional
//! availability-over-consistency tradeoff — an offline customer with a
//! legitimate serial is never blocked — with the consequence that any
//! checksum-valid unlisted serial obtains a month of full access.
//!
//! ## State ownership
//!
//! The engine never caches license state; every operation reads through
//! [`tillgate_store::LicenseStore`], and activation state is written
//! only after a validation outcome (online or offline) is fully
//! determined.

mod engine;
pub mod error;
pub mod report;

pub use engine::ActivationEngine;
pub use error::EngineError;
pub use report::{
    ActivationOutcome, EffectiveStatus, IncrementOutcome, LicenseStatusReport, Remaining,
};
