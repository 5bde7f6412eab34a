//! Token parsing and Ed25519 signature verification.

use crate::claims::Claims;
use crate::error::{TokenError, TokenResult};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use ed25519_dalek::pkcs8::DecodePublicKey;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use tracing::warn;

/// Verifies license tokens and decodes them into [`Claims`].
///
/// With a public key configured, both the signature and the payload
/// structure are checked. Without one, the payload is decoded unchecked;
/// that mode is intended for local development against a Hub that signs
/// with keys the client does not know.
pub struct TokenVerifier {
    key: Option<VerifyingKey>,
}

impl TokenVerifier {
    /// Creates a verifier that checks signatures with the given key.
    #[must_use]
    pub fn new(key: VerifyingKey) -> Self {
        Self { key: Some(key) }
    }

    /// Creates a verifier from a PEM-encoded Ed25519 public key.
    ///
    /// # Errors
    ///
    /// Returns an error if the PEM does not contain a valid Ed25519 key.
    pub fn from_pem(pem: &str) -> TokenResult<Self> {
        let key = VerifyingKey::from_public_key_pem(pem)
            .map_err(|e| TokenError::InvalidPublicKey(e.to_string()))?;
        Ok(Self::new(key))
    }

    /// Creates a verifier that decodes payloads without checking signatures.
    ///
    /// Logged once here rather than per token so a long-lived process does
    /// not flood its logs.
    #[must_use]
    pub fn unverified() -> Self {
        warn!("no license public key configured; tokens will be decoded without signature verification");
        Self { key: None }
    }

    /// Returns true if this verifier checks signatures.
    #[must_use]
    pub fn is_verifying(&self) -> bool {
        self.key.is_some()
    }

    /// Parses a token and returns its claims.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is malformed, the signature does not
    /// verify (when a key is configured), or the payload violates the
    /// claims schema.
    pub fn verify(&self, token: &str) -> TokenResult<Claims> {
        let token = token.trim();

        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() != 2 {
            return Err(TokenError::InvalidFormat(
                "token must have exactly two parts separated by a dot".to_string(),
            ));
        }

        let payload_b64 = parts[0];
        let signature_b64 = parts[1];

        if let Some(key) = &self.key {
            let sig_bytes = URL_SAFE_NO_PAD
                .decode(signature_b64)
                .map_err(|e| TokenError::InvalidFormat(format!("invalid signature base64: {e}")))?;

            let signature = Signature::from_slice(&sig_bytes)
                .map_err(|_| TokenError::InvalidFormat("invalid signature length".to_string()))?;

            // The signature covers the base64url-encoded payload string,
            // not the decoded JSON, matching the Hub's signing side.
            key.verify(payload_b64.as_bytes(), &signature)
                .map_err(|_| TokenError::InvalidSignature)?;
        }

        let payload_json = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|e| TokenError::InvalidFormat(format!("invalid payload base64: {e}")))?;

        let claims: Claims = serde_json::from_slice(&payload_json)
            .map_err(|e| TokenError::InvalidPayload(format!("invalid payload JSON: {e}")))?;

        claims.validate()?;

        Ok(claims)
    }
}
