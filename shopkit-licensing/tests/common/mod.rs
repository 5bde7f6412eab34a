//! Shared test helpers for licensing tests.

#![allow(dead_code)]

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use ed25519_dalek::pkcs8::{EncodePublicKey, LineEnding};
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use shopkit_licensing::{LicensingConfig, LicensingContext};
use shopkit_types::{DeviceId, TenantId};
use shopkit_vault::{TokenStore, VaultBackend, VaultConfig};
use tempfile::TempDir;

pub const TENANT: &str = "acme";
pub const DEVICE: &str = "till-1";

/// Returns a deterministic Ed25519 key pair from a fixed seed.
pub fn test_keypair() -> (SigningKey, VerifyingKey) {
    let seed: [u8; 32] = [
        7, 14, 21, 28, 35, 42, 49, 56, 63, 70, 77, 84, 91, 98, 105, 112, 119, 126, 133, 140, 147,
        154, 161, 168, 175, 182, 189, 196, 203, 210, 217, 224,
    ];
    let signing_key = SigningKey::from_bytes(&seed);
    let verifying_key = signing_key.verifying_key();
    (signing_key, verifying_key)
}

/// PEM encoding of the verifying key, as `LICENSE_PUBLIC_KEY_PEM` carries it.
pub fn public_key_pem(key: &VerifyingKey) -> String {
    key.to_public_key_pem(LineEnding::LF)
        .expect("encode public key")
}

/// Signs a payload the way the Hub does.
pub fn sign_token(signing_key: &SigningKey, payload_json: &str) -> String {
    let payload_b64 = URL_SAFE_NO_PAD.encode(payload_json.as_bytes());
    let signature = signing_key.sign(payload_b64.as_bytes());
    let sig_b64 = URL_SAFE_NO_PAD.encode(signature.to_bytes());
    format!("{payload_b64}.{sig_b64}")
}

/// Builds a signed token for the standard test tenant/device with the
/// given validity window (offsets in seconds relative to now).
pub fn make_token(
    signing_key: &SigningKey,
    iat_offset: i64,
    exp_offset: i64,
    grace_days: u32,
) -> String {
    let now = chrono::Utc::now().timestamp();
    let payload = format!(
        r#"{{"tenantId":"{TENANT}","deviceId":"{DEVICE}","plan":"retail-pro","entitlements":["inventory","pos"],"iat":{iat},"exp":{exp},"graceDays":{grace_days},"iss":"hub.shopkit.io"}}"#,
        iat = now + iat_offset,
        exp = now + exp_offset,
    );
    sign_token(signing_key, &payload)
}

/// Configuration pointed at a test Hub, enforcing, with the test identity.
pub fn test_config(hub_url: &str, public_key_pem: Option<String>) -> LicensingConfig {
    LicensingConfig {
        hub_base_url: hub_url.to_string(),
        enforced: Some(true),
        offline_grace_days: 7,
        renew_interval_hours: 6,
        public_key_pem,
        tenant_id: Some(TenantId::new(TENANT).unwrap()),
        device_id: Some(DeviceId::new(DEVICE).unwrap()),
    }
}

/// A file-backed vault inside the temp dir.
pub fn file_vault(dir: &TempDir) -> TokenStore {
    let config = VaultConfig {
        file_path: Some(dir.path().join("credential.lic")),
        ..VaultConfig::default()
    };
    TokenStore::with_backend(VaultBackend::EncryptedFile, config).unwrap()
}

/// Writes a token into the temp-dir vault directly, bypassing activation.
pub fn seed_token(dir: &TempDir, token: &str) {
    file_vault(dir)
        .save(
            &TenantId::new(TENANT).unwrap(),
            &DeviceId::new(DEVICE).unwrap(),
            token,
        )
        .unwrap();
}

/// Builds a context over a file vault in `dir`, verifying with the test key.
pub fn context_with(hub_url: &str, dir: &TempDir) -> LicensingContext {
    let (_, vk) = test_keypair();
    let config = test_config(hub_url, Some(public_key_pem(&vk)));
    LicensingContext::bootstrap_with_store(config, file_vault(dir)).unwrap()
}

/// Same as [`context_with`] but with custom configuration.
pub fn context_with_config(config: LicensingConfig, dir: &TempDir) -> LicensingContext {
    LicensingContext::bootstrap_with_store(config, file_vault(dir)).unwrap()
}
