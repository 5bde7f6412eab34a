//! Shared test helpers for token tests.

#![allow(dead_code)]

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};

/// Returns a deterministic Ed25519 key pair from a fixed seed.
pub fn test_keypair() -> (SigningKey, VerifyingKey) {
    let seed: [u8; 32] = [
        41, 42, 43, 44, 45, 46, 47, 48, 49, 50, 51, 52, 53, 54, 55, 56, 57, 58, 59, 60, 61, 62,
        63, 64, 65, 66, 67, 68, 69, 70, 71, 72,
    ];
    let signing_key = SigningKey::from_bytes(&seed);
    let verifying_key = signing_key.verifying_key();
    (signing_key, verifying_key)
}

/// Signs a payload the way the Hub does: the Ed25519 signature covers the
/// base64url-encoded payload string.
pub fn sign_token(signing_key: &SigningKey, payload_json: &str) -> String {
    let payload_b64 = URL_SAFE_NO_PAD.encode(payload_json.as_bytes());
    let signature = signing_key.sign(payload_b64.as_bytes());
    let sig_b64 = URL_SAFE_NO_PAD.encode(signature.to_bytes());
    format!("{payload_b64}.{sig_b64}")
}

/// Builds a claims payload with the standard test tenant/device.
pub fn claims_json(iat: i64, exp: i64, grace_days: u32) -> String {
    format!(
        r#"{{"tenantId":"acme","deviceId":"till-1","plan":"retail-pro","entitlements":["inventory","pos"],"iat":{iat},"exp":{exp},"graceDays":{grace_days},"iss":"hub.shopkit.io"}}"#
    )
}

/// Builds a signed token valid from `iat` to `exp` with a 7-day grace window.
pub fn make_token(signing_key: &SigningKey, iat: i64, exp: i64) -> String {
    sign_token(signing_key, &claims_json(iat, exp, 7))
}
