//! # angel-crypto — Cryptographic Primitives
//!
//! Provides the cryptographic building blocks for AngelNET:
//!
//! - **SHA-256 fingerprints** of reconstructed signatures (`sha256`).
//! - **Signature reconstruction** from ordered fragments (`reconstruct`).
//! - **AES-256-GCM** sealing and opening of node envelopes (`aead`).
//! - **Node key provisioning** from literal hex or the environment
//!   (`key_provider`).
//!
//! ## Crate Policy
//!
//! - Depends only on `angel-core` internally.
//! - No mocking of cryptographic operations in tests: real SHA-256, real
//!   AES-GCM, real OS randomness.
//! - Key material is zeroized on drop and never formatted.

pub mod aead;
pub mod key_provider;
pub mod reconstruct;
pub mod sha256;

pub use aead::{open, seal, AeadNonce, NodeKey, KEY_SIZE, NONCE_SIZE, TAG_SIZE};
pub use key_provider::KeySource;
pub use reconstruct::{reconstruct, verify, SignatureReconstructor};
pub use sha256::fingerprint;
