//! # Nonce Registry
//!
//! Opt-in single-use enforcement for proofs. The proof engine is
//! stateless and will verify the same proof any number of times; callers
//! that must reject replays consume each proof through a `NonceRegistry`
//! after verifying it.
//!
//! The registry only grows. Bounding or expiring it is left to the owner.

use std::collections::HashSet;

use parking_lot::Mutex;
use thiserror::Error;

use crate::commitment::{Proof, PROOF_NONCE_SIZE};

/// Error consuming a proof.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    /// The proof's nonce has already been consumed.
    #[error("proof nonce {nonce_hex} has already been consumed")]
    NonceReused {
        /// Hex rendering of the reused nonce.
        nonce_hex: String,
    },
}

/// Set of consumed proof nonces. Safe to share across threads.
#[derive(Debug, Default)]
pub struct NonceRegistry {
    consumed: Mutex<HashSet<[u8; PROOF_NONCE_SIZE]>>,
}

impl NonceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `proof`'s nonce as consumed.
    ///
    /// # Errors
    ///
    /// `ReplayError::NonceReused` if the nonce was consumed before. The
    /// registry is unchanged in that case.
    pub fn consume(&self, proof: &Proof) -> Result<(), ReplayError> {
        let mut consumed = self.consumed.lock();
        if !consumed.insert(proof.nonce) {
            tracing::warn!(fingerprint = %proof.fingerprint, "proof replay rejected");
            return Err(ReplayError::NonceReused {
                nonce_hex: hex::encode(proof.nonce),
            });
        }
        Ok(())
    }

    /// Whether `proof`'s nonce has been consumed.
    pub fn contains(&self, proof: &Proof) -> bool {
        self.consumed.lock().contains(&proof.nonce)
    }

    /// Number of consumed nonces.
    pub fn len(&self) -> usize {
        self.consumed.lock().len()
    }

    /// Whether no nonce has been consumed yet.
    pub fn is_empty(&self) -> bool {
        self.consumed.lock().is_empty()
    }
}
