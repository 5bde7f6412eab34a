//! Fallback device identity.
//!
//! Used when `DEVICE_ID` is not configured. Combines stable machine
//! identifiers into a hash so the same installation derives the same id
//! across restarts, while two machines practically never collide.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use sha2::{Digest, Sha256};
use shopkit_types::DeviceId;
use std::env;

/// Derives a stable device identifier for this machine.
#[must_use]
pub fn fallback_device_id() -> DeviceId {
    let components = collect_machine_ids();
    let combined = components.join("|");

    let mut hasher = Sha256::new();
    hasher.update(combined.as_bytes());
    let hash = hasher.finalize();

    let id = URL_SAFE_NO_PAD.encode(&hash[..16]);
    DeviceId::new(id).expect("hash encoding is non-empty")
}

/// Collects machine identifiers for the derived id.
fn collect_machine_ids() -> Vec<String> {
    let mut ids = Vec::new();

    ids.push(env::consts::OS.to_string());
    ids.push(env::consts::ARCH.to_string());
    ids.push(get_hostname());

    if let Some(machine_id) = get_machine_id() {
        ids.push(machine_id);
    }

    if let Ok(user) = env::var("USER").or_else(|_| env::var("USERNAME")) {
        ids.push(user);
    }

    ids
}

fn get_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Platform-specific stable machine identifier.
fn get_machine_id() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/etc/machine-id")
            .or_else(|_| std::fs::read_to_string("/var/lib/dbus/machine-id"))
            .ok()
            .map(|s| s.trim().to_string())
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("ioreg")
            .args(["-rd1", "-c", "IOPlatformExpertDevice"])
            .output()
            .ok()
            .and_then(|o| String::from_utf8(o.stdout).ok())
            .and_then(|output| {
                output
                    .lines()
                    .find(|l| l.contains("IOPlatformUUID"))
                    .and_then(|l| l.split('"').nth(3))
                    .map(String::from)
            })
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_id_is_stable() {
        assert_eq!(fallback_device_id(), fallback_device_id());
    }

    #[test]
    fn derived_id_is_short_and_printable() {
        let id = fallback_device_id();
        assert!(id.as_str().len() <= 24);
        assert!(id.as_str().chars().all(|c| c.is_ascii_graphic()));
        assert!(!id.as_str().contains(':'));
    }
}
