use shopkit_types::{DeviceId, IdError, TenantId};
use std::str::FromStr;

// ── Construction ─────────────────────────────────────────────────

#[test]
fn tenant_id_accepts_non_empty() {
    let id = TenantId::new("acme-west").unwrap();
    assert_eq!(id.as_str(), "acme-west");
}

#[test]
fn tenant_id_rejects_empty() {
    assert_eq!(TenantId::new("").unwrap_err(), IdError::Empty);
    assert_eq!(TenantId::new("   ").unwrap_err(), IdError::Empty);
}

#[test]
fn device_id_rejects_empty() {
    assert_eq!(DeviceId::new("").unwrap_err(), IdError::Empty);
}

// ── Display / FromStr ────────────────────────────────────────────

#[test]
fn display_round_trip() {
    let id = TenantId::new("tenant-42").unwrap();
    assert_eq!(id.to_string(), "tenant-42");
}

#[test]
fn from_str_parses() {
    let id = DeviceId::from_str("pos-terminal-3").unwrap();
    assert_eq!(id.as_str(), "pos-terminal-3");
}

// ── Serde ────────────────────────────────────────────────────────

#[test]
fn serializes_transparently() {
    let id = TenantId::new("acme").unwrap();
    assert_eq!(serde_json::to_string(&id).unwrap(), r#""acme""#);

    let back: TenantId = serde_json::from_str(r#""acme""#).unwrap();
    assert_eq!(back, id);
}
