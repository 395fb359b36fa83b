//! # Fingerprints — Fixed-Length Signature Digests
//!
//! Defines `Fingerprint` and `DigestAlgorithm`, the integrity anchor of the
//! pipeline. A fingerprint is the public value against which proofs are
//! generated and verified; the signature it was computed from stays private.
//!
//! `Sha256Accumulator` is the incremental hasher used wherever a digest is
//! computed over several byte slices (fragment streams, proof commitments).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::error::ValidationError;

/// Length of every fingerprint in bytes.
pub const FINGERPRINT_LEN: usize = 32;

/// The hash algorithm used to produce a fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    /// SHA-256.
    Sha256,
}

impl DigestAlgorithm {
    /// Returns the algorithm identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
        }
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A one-way, fixed-length digest of a signature, tagged with its algorithm.
///
/// Serializes as the bare lowercase hex string. `Display` renders the
/// self-describing form `sha256:<hex>`; [`Fingerprint::from_hex`] accepts
/// either form.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    algorithm: DigestAlgorithm,
    bytes: [u8; FINGERPRINT_LEN],
}

impl Fingerprint {
    /// Create a fingerprint from raw digest bytes and algorithm.
    pub fn new(algorithm: DigestAlgorithm, bytes: [u8; FINGERPRINT_LEN]) -> Self {
        Self { algorithm, bytes }
    }

    /// The algorithm that produced this fingerprint.
    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; FINGERPRINT_LEN] {
        &self.bytes
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Parse a fingerprint from 64 hex characters, optionally prefixed
    /// with `sha256:`.
    pub fn from_hex(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        let hex_part = s.strip_prefix("sha256:").unwrap_or(s);
        if hex_part.len() != FINGERPRINT_LEN * 2 {
            return Err(ValidationError::InvalidFingerprint(format!(
                "expected {} hex chars, got {}",
                FINGERPRINT_LEN * 2,
                hex_part.len()
            )));
        }
        let mut bytes = [0u8; FINGERPRINT_LEN];
        hex::decode_to_slice(hex_part, &mut bytes)
            .map_err(|e| ValidationError::InvalidFingerprint(e.to_string()))?;
        Ok(Self::new(DigestAlgorithm::Sha256, bytes))
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.to_hex())
    }
}

impl std::fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Fingerprint({self})")
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Incremental SHA-256 over a sequence of byte slices.
///
/// Feeding slices `a` then `b` yields the same digest as hashing `a || b`.
#[derive(Clone, Default)]
pub struct Sha256Accumulator {
    hasher: Sha256,
}

impl Sha256Accumulator {
    /// Start a new accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append bytes to the running digest.
    pub fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    /// Finish and return the raw 32-byte digest.
    pub fn finalize_bytes(self) -> [u8; FINGERPRINT_LEN] {
        self.hasher.finalize().into()
    }

    /// Finish and return the digest as a SHA-256 fingerprint.
    pub fn finalize(self) -> Fingerprint {
        Fingerprint::new(DigestAlgorithm::Sha256, self.finalize_bytes())
    }
}
