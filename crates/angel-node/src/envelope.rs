//! # Ciphertext Envelope
//!
//! The encrypted form of a signature, addressed to exactly one node.
//! Serializes with hex-encoded byte fields so it can ride any transport as
//! an opaque JSON payload.

use angel_core::NodeId;
use angel_crypto::{AeadNonce, TAG_SIZE};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A signature sealed under one node's key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// The node whose key sealed this envelope. Bound as AEAD associated
    /// data, so editing it invalidates the envelope.
    pub node_id: NodeId,
    /// AES-GCM nonce used for this envelope.
    pub nonce: AeadNonce,
    /// Ciphertext followed by the 16-byte authentication tag.
    #[serde(serialize_with = "to_hex", deserialize_with = "from_hex")]
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// The 16-byte authentication tag, if the ciphertext is long enough to
    /// carry one.
    pub fn tag(&self) -> Option<&[u8]> {
        self.ciphertext
            .len()
            .checked_sub(TAG_SIZE)
            .map(|start| &self.ciphertext[start..])
    }

    /// Length of the sealed plaintext (ciphertext minus tag).
    pub fn payload_len(&self) -> usize {
        self.ciphertext.len().saturating_sub(TAG_SIZE)
    }
}

fn to_hex<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}

fn from_hex<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    let s = String::deserialize(deserializer)?;
    hex::decode(s).map_err(serde::de::Error::custom)
}
