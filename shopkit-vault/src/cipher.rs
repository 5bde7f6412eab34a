//! Encryption for the fallback credential file.
//!
//! The file is sealed with ChaCha20-Poly1305 under a key derived from the
//! device identifier, so a record copied to another machine does not
//! decrypt. On disk the record is `base64(nonce):base64(ciphertext)` with
//! a fresh random nonce per write.

use crate::error::{VaultError, VaultResult};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use rand::RngCore;
use sha2::{Digest, Sha256};
use shopkit_types::DeviceId;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of the nonce in bytes (96 bits for ChaCha20-Poly1305).
const NONCE_SIZE: usize = 12;

/// Domain separation salt mixed into the device-derived key.
const KEY_SALT: &[u8] = b"shopkit-credential-v1";

/// A device-derived encryption key, zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub(crate) struct VaultKey {
    bytes: [u8; 32],
}

impl VaultKey {
    /// Derives the sealing key for a device: SHA-256(device id ‖ salt).
    pub(crate) fn for_device(device_id: &DeviceId) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(device_id.as_str().as_bytes());
        hasher.update(KEY_SALT);
        let hash = hasher.finalize();

        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hash);
        Self { bytes }
    }
}

impl std::fmt::Debug for VaultKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Encrypts a plaintext record into the on-disk `nonce:ciphertext` form.
pub(crate) fn seal(key: &VaultKey, plaintext: &[u8]) -> VaultResult<String> {
    let cipher = ChaCha20Poly1305::new((&key.bytes).into());

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| VaultError::Crypto(e.to_string()))?;

    Ok(format!(
        "{}:{}",
        BASE64.encode(nonce_bytes),
        BASE64.encode(&ciphertext)
    ))
}

/// Decrypts the on-disk form. Fails on tampering or a wrong device key.
pub(crate) fn open(key: &VaultKey, encoded: &str) -> VaultResult<Vec<u8>> {
    let (nonce_b64, ct_b64) = encoded
        .split_once(':')
        .ok_or_else(|| VaultError::Crypto("missing nonce separator".to_string()))?;

    let nonce_bytes = BASE64
        .decode(nonce_b64.trim())
        .map_err(|e| VaultError::Crypto(format!("invalid nonce base64: {e}")))?;
    if nonce_bytes.len() != NONCE_SIZE {
        return Err(VaultError::Crypto("invalid nonce length".to_string()));
    }

    let ciphertext = BASE64
        .decode(ct_b64.trim())
        .map_err(|e| VaultError::Crypto(format!("invalid ciphertext base64: {e}")))?;

    let cipher = ChaCha20Poly1305::new((&key.bytes).into());
    cipher
        .decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_ref())
        .map_err(|_| VaultError::Crypto("decryption failed (wrong key or tampered data)".to_string()))
}
