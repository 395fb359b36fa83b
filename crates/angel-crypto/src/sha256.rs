//! # SHA-256 Fingerprinting
//!
//! The integrity unit of the pipeline. A fingerprint is SHA-256 over the
//! raw signature bytes, with no framing or domain tag, so that it matches
//! any external `sha256(signature)` computation.

use angel_core::{Fingerprint, Sha256Accumulator, Signature};

/// Compute the SHA-256 fingerprint of a signature.
///
/// Pure and deterministic. The empty signature has the well-defined
/// fingerprint of the empty input.
pub fn fingerprint(signature: &Signature) -> Fingerprint {
    let mut acc = Sha256Accumulator::new();
    acc.update(signature.as_bytes());
    acc.finalize()
}
