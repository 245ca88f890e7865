//! # tillgate-hwid — Hardware Fingerprint Generator
//!
//! Derives a reasonably stable device identity string used to bind a
//! license activation to a machine.
//!
//! ## Structure
//!
//! The fingerprint is `{primary}-{secondary}`:
//!
//! - **Primary (stable tier, 16 hex chars)** — CPU model, CPU
//!   architecture, OS platform, motherboard identifier, OS machine id.
//!   These survive reboots, network changes, and OS updates.
//! - **Secondary (semi-stable tier, 8 hex chars)** — primary MAC
//!   address, hostname, platform+OS-release. These may drift (renamed
//!   host, swapped NIC) without invalidating the stable tier.
//!
//! Each tier is serialized canonically as `key=value` lines and hashed
//! with SHA-256, truncated.
//!
//! ## Failure behavior
//!
//! [`Fingerprinter::generate`] never fails. Individual probes fall back
//! to sentinels (`unknown-motherboard`, `unknown-machine-id`, `no-mac`);
//! if signal gathering as a whole fails, a basic fallback fingerprint is
//! produced from {platform, arch, hostname, core count, current time}.
//! The fallback includes wall-clock time and is NOT stable across runs —
//! it is a last resort, not a normal mode.

mod board;
mod machine_id;
mod net;

use std::time::Duration;

use sha2::{Digest, Sha256};
use sysinfo::System;
use thiserror::Error;

/// Upper bound on the motherboard subprocess probe. The probe must never
/// stall an activation request; on timeout the sentinel is used instead.
const BOARD_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Errors internal to signal gathering. Never escape [`Fingerprinter::generate`].
#[derive(Error, Debug)]
enum HwidError {
    #[error("no CPU information available from the OS")]
    NoCpuInfo,
}

/// Hardware fingerprint generator.
#[derive(Debug, Clone)]
pub struct Fingerprinter {
    board_probe_timeout: Duration,
}

impl Default for Fingerprinter {
    fn default() -> Self {
        Self::new()
    }
}

impl Fingerprinter {
    /// Create a generator with the default probe timeout.
    pub fn new() -> Self {
        Self {
            board_probe_timeout: BOARD_PROBE_TIMEOUT,
        }
    }

    /// Generate the device fingerprint. Infallible; see module docs for
    /// the fallback behavior.
    pub async fn generate(&self) -> String {
        match self.gather().await {
            Ok(fingerprint) => fingerprint,
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    "hardware signal gathering failed; using basic fallback fingerprint"
                );
                basic_fallback_fingerprint()
            }
        }
    }

    async fn gather(&self) -> Result<String, HwidError> {
        let sys = System::new_all();

        // Stable tier.
        let cpu_model = sys
            .cpus()
            .first()
            .map(|cpu| normalize_whitespace(cpu.brand()))
            .ok_or(HwidError::NoCpuInfo)?;
        let board = board::board_identifier(self.board_probe_timeout).await;
        let machine = machine_id::machine_id().unwrap_or_else(|| "unknown-machine-id".to_string());
        let stable = format!(
            "cpu_model={cpu_model}\narch={arch}\nplatform={platform}\nboard={board}\nmachine_id={machine}\n",
            arch = std::env::consts::ARCH,
            platform = std::env::consts::OS,
        );

        // Semi-stable tier.
        let mac = net::primary_mac();
        let hostname = System::host_name().unwrap_or_else(|| "unknown-host".to_string());
        let release = System::os_version().unwrap_or_else(|| "unknown".to_string());
        let semi_stable = format!(
            "mac={mac}\nhostname={hostname}\nos={platform}-{release}\n",
            platform = std::env::consts::OS,
        );

        Ok(format!(
            "{}-{}",
            sha256_hex_truncated(&stable, 16),
            sha256_hex_truncated(&semi_stable, 8)
        ))
    }
}

/// Basic fallback fingerprint: hash of coarse machine facts plus the
/// current time, truncated to 24 hex characters. Unstable across runs.
fn basic_fallback_fingerprint() -> String {
    let sys = System::new_all();
    let input = format!(
        "platform={}\narch={}\nhostname={}\ncores={}\nts={}\n",
        std::env::consts::OS,
        std::env::consts::ARCH,
        System::host_name().unwrap_or_else(|| "unknown-host".to_string()),
        sys.cpus().len(),
        chrono::Utc::now().timestamp_micros(),
    );
    sha256_hex_truncated(&input, 24)
}

/// Collapse runs of whitespace to single spaces and trim. CPU model
/// strings are padded inconsistently across firmware revisions.
fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Compute the SHA-256 hex digest of `input`, truncated to `len` chars.
fn sha256_hex_truncated(input: &str, len: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    hex[..len].to_string()
}
