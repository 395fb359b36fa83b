//! # Node Envelope Encryption (AES-256-GCM)
//!
//! Seals a signature under a node's symmetric key and opens it again.
//!
//! ```text
//! seal:  nonce <- OsRng(12)
//!        ct||tag = AES-256-GCM(key, nonce, plaintext, aad = node_id)
//! open:  plaintext = AES-256-GCM-Decrypt(key, nonce, ct||tag, aad = node_id)
//!        (error if the key, nonce, aad, or any ciphertext byte differs)
//! ```
//!
//! The node id is bound as associated data, so an envelope re-addressed to
//! another node fails authentication even under the same key.
//!
//! ## Nonce Discipline
//!
//! Nonces are random, never counters. Random 96-bit nonces are safe for up
//! to 2^32 seals per key.

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce as GcmNonce,
};
use angel_core::CryptoError;
use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of the AES-GCM nonce in bytes (96 bits).
pub const NONCE_SIZE: usize = 12;

/// Size of the AES-GCM authentication tag in bytes (128 bits).
pub const TAG_SIZE: usize = 16;

/// Size of a node key in bytes (256 bits).
pub const KEY_SIZE: usize = 32;

/// A per-seal AES-GCM nonce. Serializes as 24 hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AeadNonce([u8; NONCE_SIZE]);

impl AeadNonce {
    /// Draw a fresh nonce from the OS CSPRNG.
    pub fn random() -> Self {
        let mut bytes = [0u8; NONCE_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Wrap existing nonce bytes.
    pub fn from_bytes(bytes: [u8; NONCE_SIZE]) -> Self {
        Self(bytes)
    }

    /// The raw nonce bytes.
    pub fn as_bytes(&self) -> &[u8; NONCE_SIZE] {
        &self.0
    }
}

impl Serialize for AeadNonce {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for AeadNonce {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let mut bytes = [0u8; NONCE_SIZE];
        hex::decode_to_slice(&s, &mut bytes).map_err(serde::de::Error::custom)?;
        Ok(Self(bytes))
    }
}

/// A node's AES-256-GCM key.
///
/// Zeroized on drop. Deliberately implements neither `Clone`, `Debug` nor
/// `Serialize`: a key belongs to exactly one node.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct NodeKey([u8; KEY_SIZE]);

impl NodeKey {
    /// Generate a fresh random key from the OS CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Build a key from a slice, rejecting any length other than 32.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; KEY_SIZE] = bytes.try_into().map_err(|_| {
            CryptoError::InvalidKey(format!(
                "expected {KEY_SIZE} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(arr))
    }

    /// Parse a key from 64 hex characters.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let mut decoded =
            hex::decode(s.trim()).map_err(|e| CryptoError::HexDecode(e.to_string()))?;
        let key = Self::from_slice(&decoded);
        decoded.zeroize();
        key
    }

    fn cipher(&self) -> Result<Aes256Gcm, String> {
        Aes256Gcm::new_from_slice(&self.0).map_err(|e| e.to_string())
    }
}

/// Encrypt `plaintext` under `key`, binding `aad`.
///
/// Returns the fresh nonce and `ciphertext || tag`.
pub fn seal(
    key: &NodeKey,
    plaintext: &[u8],
    aad: &[u8],
) -> Result<(AeadNonce, Vec<u8>), CryptoError> {
    let nonce = AeadNonce::random();
    let cipher = key
        .cipher()
        .map_err(|e| CryptoError::Encryption(format!("invalid key: {e}")))?;
    let ciphertext = cipher
        .encrypt(
            GcmNonce::from_slice(nonce.as_bytes()),
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;
    Ok((nonce, ciphertext))
}

/// Decrypt `ciphertext || tag` under `key`, checking `aad`.
///
/// Any mismatch (key, nonce, aad, or a flipped ciphertext bit) is reported
/// as a single `CryptoError::Decryption`; the cause is not distinguished.
pub fn open(
    key: &NodeKey,
    nonce: &AeadNonce,
    ciphertext: &[u8],
    aad: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    if ciphertext.len() < TAG_SIZE {
        return Err(CryptoError::Decryption(format!(
            "ciphertext shorter than the {TAG_SIZE}-byte tag"
        )));
    }
    let cipher = key
        .cipher()
        .map_err(|e| CryptoError::Decryption(format!("invalid key: {e}")))?;
    cipher
        .decrypt(
            GcmNonce::from_slice(nonce.as_bytes()),
            Payload {
                msg: ciphertext,
                aad,
            },
        )
        .map_err(|_| CryptoError::Decryption("authentication tag mismatch".to_string()))
}
