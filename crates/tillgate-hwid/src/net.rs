//! Primary MAC address selection for the semi-stable fingerprint tier.
//!
//! Wired interfaces (`eth*`, `en*`) are preferred over whatever else the
//! OS enumerates first — USB tethering and VPN tunnels come and go, the
//! onboard NIC usually does not.

use network_interface::{NetworkInterface, NetworkInterfaceConfig};

/// Sentinel when no interface exposes a usable MAC.
const NO_MAC: &str = "no-mac";

/// Pick the primary MAC address: first a wired-named interface with a
/// non-zero MAC, then any interface with a non-zero MAC, then the
/// sentinel.
pub(crate) fn primary_mac() -> String {
    let interfaces = match NetworkInterface::show() {
        Ok(list) => list,
        Err(err) => {
            tracing::warn!(error = %err, "network interface enumeration failed");
            return NO_MAC.to_string();
        }
    };

    let usable = |iface: &&NetworkInterface| -> bool {
        iface
            .mac_addr
            .as_deref()
            .is_some_and(|mac| !mac.is_empty() && !is_zero_mac(mac))
    };

    if let Some(iface) = interfaces
        .iter()
        .filter(usable)
        .find(|i| is_wired_name(&i.name))
    {
        if let Some(mac) = &iface.mac_addr {
            return mac.to_lowercase();
        }
    }

    interfaces
        .iter()
        .filter(usable)
        .filter_map(|i| i.mac_addr.as_ref())
        .map(|mac| mac.to_lowercase())
        .next()
        .unwrap_or_else(|| NO_MAC.to_string())
}

fn is_wired_name(name: &str) -> bool {
    name.starts_with("eth") || name.starts_with("en")
}

fn is_zero_mac(mac: &str) -> bool {
    mac.bytes().all(|b| b == b'0' || b == b':' || b == b'-')
}
