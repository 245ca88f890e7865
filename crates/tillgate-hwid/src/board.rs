//! Motherboard identity probe for the stable fingerprint tier.
//!
//! Windows exposes a baseboard serial through WMI; other platforms get a
//! generic placeholder. The probe shells out, so it is bounded by a
//! timeout — a wedged WMI provider must not stall activation requests.

use std::time::Duration;

/// Sentinel when the platform probe errors out or times out.
#[cfg(target_os = "windows")]
const UNKNOWN_BOARD: &str = "unknown-motherboard";

/// Placeholder on platforms without a board probe.
#[cfg(not(target_os = "windows"))]
const GENERIC_BOARD: &str = "generic-board";

/// Resolve the motherboard identifier, bounded by `timeout`.
pub(crate) async fn board_identifier(timeout: Duration) -> String {
    #[cfg(target_os = "windows")]
    {
        match tokio::time::timeout(timeout, probe_windows()).await {
            Ok(Some(serial)) => serial,
            Ok(None) => UNKNOWN_BOARD.to_string(),
            Err(_) => {
                tracing::warn!("motherboard probe timed out; using sentinel");
                UNKNOWN_BOARD.to_string()
            }
        }
    }

    #[cfg(not(target_os = "windows"))]
    {
        let _ = timeout;
        GENERIC_BOARD.to_string()
    }
}

#[cfg(target_os = "windows")]
async fn probe_windows() -> Option<String> {
    let output = tokio::process::Command::new("wmic")
        .args(["baseboard", "get", "serialnumber"])
        .output()
        .await
        .ok()?;
    if !output.status.success() {
        return None;
    }
    // Output is a header line ("SerialNumber") followed by the value.
    let text = String::from_utf8_lossy(&output.stdout);
    let serial = text.lines().map(str::trim).skip(1).find(|l| !l.is_empty())?;
    Some(serial.to_string())
}
