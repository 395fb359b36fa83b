//! # Node Key Provisioning
//!
//! Node keys are provisioned externally and injected at node construction.
//! `KeySource` names where the key material comes from:
//!
//! - [`KeySource::Hex`]: a literal 64-character hex string, for tests and
//!   local development.
//! - [`KeySource::Env`]: an environment variable holding the hex string,
//!   for deployments where secrets are injected via environment.
//! - [`KeySource::Generate`]: a fresh random key that lives only in this
//!   process. Envelopes sealed under it cannot be opened after a restart.
//!
//! There is no derivation or rotation scheme.

use angel_core::CryptoError;
use zeroize::Zeroizing;

use crate::aead::NodeKey;

/// Where a node's key material comes from.
#[derive(Clone, PartialEq, Eq)]
pub enum KeySource {
    /// Literal hex-encoded key.
    Hex(String),
    /// Name of an environment variable holding a hex-encoded key.
    Env(String),
    /// Generate a random process-local key.
    Generate,
}

impl KeySource {
    /// Resolve the source into key material.
    ///
    /// # Errors
    ///
    /// `CryptoError::InvalidKey` if the environment variable is unset or
    /// the material has the wrong length; `CryptoError::HexDecode` if it is
    /// not valid hex.
    pub fn resolve(&self) -> Result<NodeKey, CryptoError> {
        match self {
            Self::Hex(hex) => NodeKey::from_hex(hex),
            Self::Env(var_name) => {
                let hex = Zeroizing::new(std::env::var(var_name).map_err(|_| {
                    CryptoError::InvalidKey(format!("environment variable {var_name} not set"))
                })?);
                NodeKey::from_hex(&hex)
            }
            Self::Generate => Ok(NodeKey::generate()),
        }
    }

    /// Short label for diagnostics. Never includes key material.
    pub fn describe(&self) -> String {
        match self {
            Self::Hex(_) => "hex".to_string(),
            Self::Env(var_name) => format!("env:{var_name}"),
            Self::Generate => "generated".to_string(),
        }
    }
}

impl std::fmt::Debug for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KeySource({})", self.describe())
    }
}
