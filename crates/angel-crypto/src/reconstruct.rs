//! # Signature Reconstruction
//!
//! Merges ordered fragments into one signature and tags it with its
//! integrity fingerprint.
//!
//! ## Invariants
//!
//! - Concatenation order is submission order. Fragments are never sorted,
//!   deduplicated, or trimmed.
//! - Reconstruction is pure: the same fragment sequence always yields a
//!   byte-identical signature.
//! - An empty fragment sequence yields the empty signature, not an error.

use angel_core::{Fingerprint, Fragment, Signature};

use crate::sha256;

/// Concatenate fragments, in the order given, into a signature.
pub fn reconstruct(fragments: &[Fragment]) -> Signature {
    let total: usize = fragments.iter().map(Fragment::len).sum();
    let mut signature = Signature::from_bytes(Vec::with_capacity(total));
    for fragment in fragments {
        signature.extend_from_fragment(fragment);
    }
    signature
}

/// Compute the integrity fingerprint of a signature.
///
/// Does not mutate the signature. Delegates to [`sha256::fingerprint`].
pub fn verify(signature: &Signature) -> Fingerprint {
    sha256::fingerprint(signature)
}

/// Incremental form of [`reconstruct`] for callers that receive fragments
/// one at a time.
#[derive(Debug, Clone, Default)]
pub struct SignatureReconstructor {
    fragments: Vec<Fragment>,
}

impl SignatureReconstructor {
    /// Start with no fragments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with room for `n` fragments.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            fragments: Vec::with_capacity(n),
        }
    }

    /// Submit the next fragment.
    pub fn push(&mut self, fragment: Fragment) {
        self.fragments.push(fragment);
    }

    /// Number of fragments submitted so far.
    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    /// Build the signature from every fragment submitted so far.
    ///
    /// Does not consume the submitted fragments; calling this twice yields
    /// the same signature.
    pub fn reconstruct(&self) -> Signature {
        reconstruct(&self.fragments)
    }

    /// Reconstruct and fingerprint in one step.
    pub fn verify(&self) -> Fingerprint {
        verify(&self.reconstruct())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn frags(parts: &[&str]) -> Vec<Fragment> {
        parts.iter().map(|p| Fragment::from(*p)).collect()
    }

    #[test]
    fn test_reconstruct_concatenates_in_order() {
        let sig = reconstruct(&frags(&["id-", "alpha", "-001"]));
        assert_eq!(sig.as_bytes(), b"id-alpha-001");
    }

    #[test]
    fn test_reconstruct_does_not_reorder() {
        let sig = reconstruct(&frags(&["layer3", "layer1", "layer2"]));
        assert_eq!(sig.as_bytes(), b"layer3layer1layer2");
    }

    #[test]
    fn test_reconstruct_empty_is_empty_signature() {
        let sig = reconstruct(&[]);
        assert!(sig.is_empty());
        assert_eq!(
            verify(&sig).to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_reconstruct_keeps_empty_fragments() {
        let sig = reconstruct(&frags(&["a", "", "b"]));
        assert_eq!(sig.as_bytes(), b"ab");
    }

    #[test]
    fn test_reconstruct_sizes_buffer_to_total_length() {
        let bytes = reconstruct(&frags(&["id-", "alpha", "-001"])).into_bytes();
        assert_eq!(bytes.len(), 12);
        assert_eq!(bytes.capacity(), 12);
    }

    #[test]
    fn test_verify_does_not_mutate() {
        let sig = reconstruct(&frags(&["id-", "alpha", "-001"]));
        let before = sig.clone();
        let _ = verify(&sig);
        assert_eq!(sig, before);
    }

    #[test]
    fn test_reconstructor_incremental_matches_batch() {
        let mut r = SignatureReconstructor::new();
        r.push(Fragment::from("id-"));
        r.push(Fragment::from("alpha"));
        r.push(Fragment::from("-001"));
        assert_eq!(r.fragment_count(), 3);
        assert_eq!(r.reconstruct(), reconstruct(&frags(&["id-", "alpha", "-001"])));
        assert_eq!(r.verify(), verify(&r.reconstruct()));
    }

    #[test]
    fn test_reconstructor_is_idempotent() {
        let mut r = SignatureReconstructor::new();
        r.push(Fragment::from("x"));
        assert_eq!(r.reconstruct(), r.reconstruct());
    }

    fn fragment_vec() -> impl Strategy<Value = Vec<Vec<u8>>> {
        proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..32), 0..8)
    }

    proptest! {
        #[test]
        fn prop_reconstruct_deterministic(parts in fragment_vec()) {
            let fragments: Vec<Fragment> = parts.into_iter().map(Fragment::from).collect();
            let a = reconstruct(&fragments);
            let b = reconstruct(&fragments);
            prop_assert_eq!(a.as_bytes(), b.as_bytes());
            prop_assert_eq!(verify(&a), verify(&b));
        }

        #[test]
        fn prop_single_byte_change_changes_fingerprint(
            parts in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 1..32), 1..8),
            pick in any::<prop::sample::Index>(),
            byte_pick in any::<prop::sample::Index>(),
            delta in 1u8..=255,
        ) {
            let original: Vec<Fragment> = parts.iter().cloned().map(Fragment::from).collect();
            let mut mutated_parts = parts.clone();
            let i = pick.index(mutated_parts.len());
            let j = byte_pick.index(mutated_parts[i].len());
            mutated_parts[i][j] = mutated_parts[i][j].wrapping_add(delta);
            let mutated: Vec<Fragment> = mutated_parts.into_iter().map(Fragment::from).collect();
            prop_assert_ne!(verify(&reconstruct(&original)), verify(&reconstruct(&mutated)));
        }
    }
}
