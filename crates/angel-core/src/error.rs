//! # Error Types — Structured Error Hierarchy
//!
//! Errors shared across the AngelNET crates. All errors use `thiserror`
//! for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Cryptographic errors fail loudly with context, but never include key
//!   material or plaintext in the message.
//! - Validation errors name the rejected input so callers can report it.

use thiserror::Error;

/// Error in cryptographic operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Encryption could not be performed (missing or unusable key).
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Decryption failed: wrong key, foreign envelope, or tampered ciphertext.
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// Key material is malformed (wrong length, bad encoding).
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Hex decoding failed.
    #[error("hex decode error: {0}")]
    HexDecode(String),
}

/// Error validating a textual or structural input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Node identifier is empty or contains whitespace.
    #[error("invalid node id {0:?}: must be non-empty and contain no whitespace")]
    InvalidNodeId(String),

    /// Fingerprint text could not be parsed.
    #[error("invalid fingerprint: {0}")]
    InvalidFingerprint(String),

    /// Timestamp text could not be parsed or is not UTC.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
