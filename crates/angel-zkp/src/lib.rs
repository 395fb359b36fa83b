//! # angel-zkp — Proof Engine
//!
//! Produces and checks proofs that a party knows a signature matching a
//! published fingerprint, without revealing the signature.
//!
//! ## Architecture
//!
//! - **Traits** (`traits.rs`): `ProofSystem` is the contract every engine
//!   satisfies. Generation is fallible (the witness is checked first);
//!   verification is a pure predicate.
//!
//! - **Commitment** (`commitment.rs`): `CommitmentProofSystem`, a salted
//!   hash commitment to the fingerprint. This is a deliberate
//!   simplification and is NOT a cryptographically hard zero-knowledge
//!   proof; see the module docs.
//!
//! - **Registry** (`registry.rs`): `NonceRegistry`, an opt-in collaborator
//!   for callers that need single-use proofs. The engine itself keeps no
//!   state.
//!
//! ## Crate Policy
//!
//! - Depends on `angel-core` and `angel-crypto` internally.
//! - Proof values never contain witness bytes.
//! - No `unsafe`.

pub mod commitment;
pub mod registry;
pub mod traits;

pub use commitment::{CommitmentProofSystem, Proof, PROOF_DOMAIN_TAG, PROOF_NONCE_SIZE};
pub use registry::{NonceRegistry, ReplayError};
pub use traits::{ProofError, ProofSystem};
