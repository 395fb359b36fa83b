//! # Identity Newtypes
//!
//! `Fragment` and `Signature` carry identity bytes through the pipeline;
//! `NodeId` names a processing node. Keeping them as distinct types means a
//! fragment cannot be dispatched to a node, and a node id cannot be hashed
//! as if it were a signature.
//!
//! ## Security Invariant
//!
//! `Signature` is the proof witness. It has no `Serialize` impl and its
//! `Debug` output reports only the length, so it cannot leak through logs
//! or serialized artifacts by accident.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// One ordered piece of an identity signature.
///
/// Immutable once created: the inner bytes are private and only exposed
/// by shared reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fragment(Vec<u8>);

impl Fragment {
    /// Create a fragment from raw bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Access the fragment bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of bytes in this fragment.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this fragment carries no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Fragment {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes())
    }
}

impl From<&[u8]> for Fragment {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes)
    }
}

impl From<Vec<u8>> for Fragment {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// The ordered concatenation of all fragments belonging to one identity.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Signature(Vec<u8>);

impl Signature {
    /// Wrap raw signature bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Access the signature bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the signature, returning its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Number of bytes in the signature.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the signature is empty (reconstructed from no fragments).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a fragment's bytes. Reconstruction goes through this so the
    /// concatenation order is exactly the call order.
    pub fn extend_from_fragment(&mut self, fragment: &Fragment) {
        self.0.extend_from_slice(fragment.as_bytes());
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signature(<{} bytes>)", self.0.len())
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Name of a processing node.
///
/// Validated at construction: non-empty, no whitespace. Serializes as the
/// bare string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
    /// Validate and wrap a node name.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() || id.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidNodeId(id));
        }
        Ok(Self(id))
    }

    /// The node name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for NodeId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}
