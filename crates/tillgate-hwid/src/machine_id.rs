//! OS-provided machine identifier for the stable fingerprint tier.
//! No extra permissions required; readable by normal user processes.

/// Returns the OS machine ID if available.
pub(crate) fn machine_id() -> Option<String> {
    #[cfg(target_os = "linux")]
    return machine_id_linux();

    #[cfg(target_os = "windows")]
    return machine_id_windows();

    #[cfg(target_os = "macos")]
    return machine_id_macos();

    #[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
    None
}

#[cfg(target_os = "linux")]
fn machine_id_linux() -> Option<String> {
    // systemd installs write /etc/machine-id; older dbus-only systems
    // carry the same value under /var/lib/dbus.
    for path in ["/etc/machine-id", "/var/lib/dbus/machine-id"] {
        if let Ok(contents) = std::fs::read_to_string(path) {
            let trimmed = contents.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

#[cfg(target_os = "windows")]
fn machine_id_windows() -> Option<String> {
    use winreg::enums::HKEY_LOCAL_MACHINE;
    use winreg::RegKey;

    let key = RegKey::predef(HKEY_LOCAL_MACHINE)
        .open_subkey(r"SOFTWARE\Microsoft\Cryptography")
        .ok()?;
    let guid: String = key.get_value("MachineGuid").ok()?;
    let trimmed = guid.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

#[cfg(target_os = "macos")]
fn machine_id_macos() -> Option<String> {
    use std::process::Command;

    let out = Command::new("ioreg")
        .args(["-rd1", "-c", "IOPlatformExpertDevice"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&out.stdout);
    // Line shape: "IOPlatformUUID" = "XXXXXXXX-XXXX-..." — take the
    // second quoted string.
    for line in text.lines() {
        if !line.contains("IOPlatformUUID") {
            continue;
        }
        let value = line.split('"').nth(3)?;
        let trimmed = value.trim();
        if !trimmed.is_empty() && trimmed.contains('-') {
            return Some(trimmed.to_string());
        }
    }
    None
}
