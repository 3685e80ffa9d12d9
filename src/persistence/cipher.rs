//! At-rest sealing for saves with ChaCha20-Poly1305.
//!
//! Layout: `base64url(nonce[12] || ciphertext || tag[16])`. The key lives in the client
//! build, so this keeps casual edits out of the save, nothing more.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use sha2::{Digest, Sha256};

use crate::error::CipherError;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

#[derive(Clone)]
pub struct SaveCipher {
    aead: ChaCha20Poly1305,
}

impl SaveCipher {
    /// Derives the 256-bit key from `secret`.
    pub fn new(secret: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"merge-idle/key");
        hasher.update(secret.as_bytes());
        let key = hasher.finalize();
        Self { aead: ChaCha20Poly1305::new(Key::from_slice(&key)) }
    }

    pub fn seal(&self, plaintext: &str, nonce: [u8; NONCE_LEN]) -> Result<String, CipherError> {
        let body = self
            .aead
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_bytes())
            .map_err(|_| CipherError::Seal)?;
        let mut out = Vec::with_capacity(NONCE_LEN + body.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&body);
        Ok(URL_SAFE_NO_PAD.encode(out))
    }

    pub fn open(&self, sealed: &str) -> Result<String, CipherError> {
        let raw = URL_SAFE_NO_PAD.decode(sealed.trim()).map_err(|_| CipherError::Encoding)?;
        if raw.len() < NONCE_LEN + TAG_LEN {
            return Err(CipherError::Truncated);
        }
        let (nonce, body) = raw.split_at(NONCE_LEN);
        let plain = self
            .aead
            .decrypt(Nonce::from_slice(nonce), body)
            .map_err(|_| CipherError::TagMismatch)?;
        String::from_utf8(plain).map_err(|_| CipherError::Utf8)
    }
}

/// Builds a sealing nonce from a random draw and the save time.
pub fn nonce_from(seed: u64, timestamp_ms: u64) -> [u8; NONCE_LEN] {
    let mut nonce = [0u8; NONCE_LEN];
    nonce[..8].copy_from_slice(&seed.to_le_bytes());
    nonce[8..].copy_from_slice(&(timestamp_ms as u32).to_le_bytes());
    nonce
}
