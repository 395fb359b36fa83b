//! # Commitment Proof System
//!
//! A salted hash commitment to a signature fingerprint, used as the proof
//! of knowledge for the identity pipeline.
//!
//! ## How It Works
//!
//! ```text
//! prove(fp, witness):
//!     require SHA256(witness) == fp          (else WitnessMismatch)
//!     nonce      <- OsRng(32)
//!     commitment  = SHA256(DOMAIN_TAG || fp || nonce)
//!     proof       = { fp, nonce, commitment }
//!
//! verify(proof, fp):
//!     proof.fp == fp                         (constant time)
//!     SHA256(DOMAIN_TAG || fp || proof.nonce) == proof.commitment  (constant time)
//! ```
//!
//! ## Security Notice
//!
//! This is a design simplification, not a zero-knowledge proving system.
//! What it does guarantee:
//!
//! - The proof contains no witness bytes, only the public fingerprint, a
//!   random nonce, and a hash over those two.
//! - A proof built for one fingerprint never verifies against another.
//! - The engine refuses to emit a proof for a witness it has not checked.
//!
//! What it does NOT guarantee: anyone who knows a fingerprint can compute
//! a verifying proof for it, so verification attests to the prover's
//! local witness check, not to knowledge that a third party could not
//! fake. A general-purpose proving backend behind [`ProofSystem`] is
//! required where that matters.

use angel_core::{Fingerprint, Sha256Accumulator, Signature};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::traits::{ProofError, ProofSystem};

/// Domain separation tag prefixed to every commitment.
pub const PROOF_DOMAIN_TAG: &[u8] = b"angelnet.proof.v1";

/// Size of the proof nonce in bytes.
pub const PROOF_NONCE_SIZE: usize = 32;

/// A commitment proof: the public fingerprint, the prover's nonce, and the
/// commitment binding them.
///
/// All byte fields serialize as lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    /// The fingerprint this proof was generated for.
    pub fingerprint: Fingerprint,
    /// Random nonce drawn at generation time.
    #[serde(with = "hex_array")]
    pub nonce: [u8; PROOF_NONCE_SIZE],
    /// `SHA256(PROOF_DOMAIN_TAG || fingerprint || nonce)`.
    #[serde(with = "hex_array")]
    pub commitment: [u8; 32],
}

/// The default proof engine. Stateless; one instance can serve any number
/// of threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommitmentProofSystem;

impl CommitmentProofSystem {
    /// Create the engine.
    pub fn new() -> Self {
        Self
    }

    /// Verify a JSON-encoded proof as received from a transport.
    ///
    /// Any decoding failure is a failed verification, not an error.
    pub fn verify_encoded(&self, encoded: &str, fingerprint: &Fingerprint) -> bool {
        match serde_json::from_str::<Proof>(encoded) {
            Ok(proof) => self.verify_proof(&proof, fingerprint),
            Err(e) => {
                tracing::debug!(error = %e, "rejecting undecodable proof");
                false
            }
        }
    }
}

impl ProofSystem for CommitmentProofSystem {
    type Proof = Proof;

    fn generate_proof(
        &self,
        fingerprint: &Fingerprint,
        witness: &Signature,
    ) -> Result<Proof, ProofError> {
        let actual = angel_crypto::verify(witness);
        if !bool::from(actual.as_bytes()[..].ct_eq(&fingerprint.as_bytes()[..]))
            || actual.algorithm() != fingerprint.algorithm()
        {
            return Err(ProofError::WitnessMismatch {
                claimed: *fingerprint,
                actual,
            });
        }

        let mut nonce = [0u8; PROOF_NONCE_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut nonce);
        let commitment = commit(fingerprint, &nonce);

        tracing::debug!(fingerprint = %fingerprint, "generated commitment proof");
        Ok(Proof {
            fingerprint: *fingerprint,
            nonce,
            commitment,
        })
    }

    fn verify_proof(&self, proof: &Proof, fingerprint: &Fingerprint) -> bool {
        if proof.fingerprint.algorithm() != fingerprint.algorithm() {
            return false;
        }
        let fingerprint_matches = proof.fingerprint.as_bytes()[..]
            .ct_eq(&fingerprint.as_bytes()[..]);
        let expected = commit(fingerprint, &proof.nonce);
        let commitment_matches = expected[..].ct_eq(&proof.commitment[..]);
        bool::from(fingerprint_matches & commitment_matches)
    }
}

/// `SHA256(PROOF_DOMAIN_TAG || fingerprint || nonce)`.
fn commit(fingerprint: &Fingerprint, nonce: &[u8; PROOF_NONCE_SIZE]) -> [u8; 32] {
    let mut acc = Sha256Accumulator::new();
    acc.update(PROOF_DOMAIN_TAG);
    acc.update(fingerprint.as_bytes());
    acc.update(nonce);
    acc.finalize_bytes()
}

mod hex_array {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer, const N: usize>(
        bytes: &[u8; N],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>, const N: usize>(
        deserializer: D,
    ) -> Result<[u8; N], D::Error> {
        let s = String::deserialize(deserializer)?;
        let mut out = [0u8; N];
        hex::decode_to_slice(&s, &mut out).map_err(serde::de::Error::custom)?;
        Ok(out)
    }
}
