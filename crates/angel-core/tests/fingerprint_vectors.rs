//! # Fingerprint Test Vectors
//!
//! Pins `Sha256Accumulator` output to published SHA-256 vectors and to
//! the digests of the identity scenarios used across the workspace. If
//! these change, every persisted or logged fingerprint changes with them.

use angel_core::{Fingerprint, Sha256Accumulator};
use proptest::prelude::*;

fn digest_hex(parts: &[&[u8]]) -> String {
    let mut acc = Sha256Accumulator::new();
    for part in parts {
        acc.update(part);
    }
    acc.finalize().to_hex()
}

#[test]
fn test_empty_input_vector() {
    assert_eq!(
        digest_hex(&[]),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}

#[test]
fn test_abc_vector() {
    assert_eq!(
        digest_hex(&[b"abc"]),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn test_id_alpha_scenario_vector() {
    assert_eq!(
        digest_hex(&[b"id-", b"alpha", b"-001"]),
        "1ab036bce906760e91fcfe30ba6651a7f34f408376147422a89a44614d7c7c8d"
    );
}

#[test]
fn test_layered_scenario_vector() {
    assert_eq!(
        digest_hex(&[b"layer1", b"layer2", b"layer3"]),
        "705ab54a36ba11ccc4da4a155c7b65a01738489d83c0e1469f0d963e48fdba51"
    );
}

proptest! {
    #[test]
    fn prop_hex_parse_roundtrip(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let mut acc = Sha256Accumulator::new();
        acc.update(&bytes);
        let fp = acc.finalize();
        prop_assert_eq!(Fingerprint::from_hex(&fp.to_string()).unwrap(), fp);
    }

    #[test]
    fn prop_split_point_does_not_matter(
        bytes in proptest::collection::vec(any::<u8>(), 0..256),
        split in any::<prop::sample::Index>(),
    ) {
        let at = split.index(bytes.len() + 1);
        let (a, b) = bytes.split_at(at);
        prop_assert_eq!(digest_hex(&[a, b]), digest_hex(&[&bytes]));
    }
}
