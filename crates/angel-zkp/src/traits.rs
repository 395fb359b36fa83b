//! # Proof System Trait
//!
//! Defines the interface for proving knowledge of a signature whose
//! fingerprint is public. Implementations are interchangeable behind this
//! trait, so a general-purpose proving backend can replace the commitment
//! engine without touching the pipeline.
//!
//! ## Security Invariant
//!
//! - `generate_proof` must check the witness against the claimed
//!   fingerprint before emitting anything.
//! - `verify_proof` is a predicate. Malformed or mismatched proofs yield
//!   `false`; nothing is raised.
//! - The trait requires `Send + Sync`; both operations are side-effect free.

use angel_core::{Fingerprint, Signature};
use thiserror::Error;

/// Error during proof generation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProofError {
    /// The witness does not hash to the fingerprint it is claimed to match.
    #[error("witness fingerprint {actual} does not match claimed fingerprint {claimed}")]
    WitnessMismatch {
        /// The fingerprint the caller asked to prove against.
        claimed: Fingerprint,
        /// The fingerprint of the supplied witness.
        actual: Fingerprint,
    },
}

/// Abstract interface for a proof-of-knowledge engine.
pub trait ProofSystem: Send + Sync {
    /// The proof artifact produced by this system.
    type Proof: Send + Sync;

    /// Prove knowledge of `witness` against the public `fingerprint`.
    ///
    /// # Errors
    ///
    /// `ProofError::WitnessMismatch` if `witness` does not fingerprint to
    /// `fingerprint`.
    fn generate_proof(
        &self,
        fingerprint: &Fingerprint,
        witness: &Signature,
    ) -> Result<Self::Proof, ProofError>;

    /// Whether `proof` was constructed for exactly `fingerprint`.
    fn verify_proof(&self, proof: &Self::Proof, fingerprint: &Fingerprint) -> bool;
}
