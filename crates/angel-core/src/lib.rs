//! # angel-core — Foundational Types for AngelNET
//!
//! This crate is the leaf of the AngelNET workspace. It defines the value
//! types that flow through the identity verification pipeline and the error
//! hierarchy shared by the crates above it. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtypes for every pipeline value.** `Fragment`, `Signature`,
//!    `Fingerprint`, `NodeId` are distinct types. A fingerprint cannot be
//!    passed where a signature is expected, and node ids are validated at
//!    construction.
//!
//! 2. **Signatures are witnesses.** `Signature` never prints its bytes in
//!    `Debug` output and does not implement `Serialize`. It leaves a process
//!    only inside an encrypted envelope.
//!
//! 3. **Fingerprints carry their algorithm.** Every `Fingerprint` is tagged
//!    with a `DigestAlgorithm` so rendered forms (`sha256:<hex>`) are
//!    self-describing.
//!
//! 4. **UTC-only timestamps.** `Timestamp` truncates to seconds and renders
//!    with a `Z` suffix.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `angel-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod digest;
pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use digest::{DigestAlgorithm, Fingerprint, Sha256Accumulator};
pub use error::{CryptoError, ValidationError};
pub use identity::{Fragment, NodeId, Signature};
pub use temporal::Timestamp;
