//! # Pipeline Configuration
//!
//! Node roster loaded from YAML:
//!
//! ```yaml
//! nodes:
//!   - id: A1
//!     key_hex: "<64 hex chars>"
//!   - id: B7
//!     key_env: ANGELNET_NODE_B7_KEY
//!   - id: D4
//!     key_generate: true  # random key living only in this process
//!   - id: C2            # no key: registered, but cannot seal
//! ```
//!
//! Parsing checks the shape (valid unique ids, at most one key source per
//! node). Key material is only read by [`PipelineConfig::build_registry`].

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use angel_core::{CryptoError, NodeId};
use angel_crypto::KeySource;
use angel_node::SecureNode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::registry::NodeRegistry;

/// Errors loading or applying a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The document is not valid YAML for this schema.
    #[error("failed to parse config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Key material is present but unusable.
    #[error("node {node_id}: invalid key: {source}")]
    Key {
        node_id: String,
        source: CryptoError,
    },

    /// A node entry is malformed or repeated.
    #[error("node {node_id}: {reason}")]
    Node { node_id: String, reason: String },

    /// A node names a key variable that is not set.
    #[error("node {node_id}: environment variable {var} is not set")]
    MissingEnv { node_id: String, var: String },
}

/// One node entry.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeConfig {
    /// Node name.
    pub id: String,
    /// Literal hex key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_hex: Option<String>,
    /// Environment variable holding a hex key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_env: Option<String>,
    /// Generate a random key at registry build time.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub key_generate: bool,
}

impl NodeConfig {
    /// Where this node's key comes from, or `None` for an unkeyed node.
    pub fn key_source(&self) -> Option<KeySource> {
        match (&self.key_hex, &self.key_env, self.key_generate) {
            (Some(hex), _, _) => Some(KeySource::Hex(hex.clone())),
            (None, Some(var), _) => Some(KeySource::Env(var.clone())),
            (None, None, true) => Some(KeySource::Generate),
            (None, None, false) => None,
        }
    }

    fn key_source_count(&self) -> usize {
        usize::from(self.key_hex.is_some())
            + usize::from(self.key_env.is_some())
            + usize::from(self.key_generate)
    }

    fn build_node(&self) -> Result<SecureNode, ConfigError> {
        let id = NodeId::new(self.id.as_str()).map_err(|e| ConfigError::Node {
            node_id: self.id.clone(),
            reason: e.to_string(),
        })?;
        let Some(source) = self.key_source() else {
            tracing::warn!(node_id = %id, "node configured without a key");
            return Ok(SecureNode::unkeyed(id));
        };
        if let KeySource::Env(var) = &source {
            if std::env::var_os(var).is_none() {
                return Err(ConfigError::MissingEnv {
                    node_id: self.id.clone(),
                    var: var.clone(),
                });
            }
        }
        let key = source.resolve().map_err(|source| ConfigError::Key {
            node_id: self.id.clone(),
            source,
        })?;
        tracing::debug!(node_id = %id, key_source = %source.describe(), "node key loaded");
        Ok(SecureNode::new(id, key))
    }
}

impl std::fmt::Debug for NodeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeConfig")
            .field("id", &self.id)
            .field("key_hex", &self.key_hex.as_ref().map(|_| "[REDACTED]"))
            .field("key_env", &self.key_env)
            .field("key_generate", &self.key_generate)
            .finish()
    }
}

/// The node roster.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
}

impl PipelineConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&content)?;
        tracing::debug!(path = %path.display(), nodes = config.nodes.len(), "pipeline config loaded");
        Ok(config)
    }

    /// Check ids and key source exclusivity without touching key material.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = BTreeSet::new();
        for node in &self.nodes {
            NodeId::new(node.id.as_str()).map_err(|e| ConfigError::Node {
                node_id: node.id.clone(),
                reason: e.to_string(),
            })?;
            if !seen.insert(node.id.as_str()) {
                return Err(ConfigError::Node {
                    node_id: node.id.clone(),
                    reason: "duplicate node id".to_string(),
                });
            }
            if node.key_source_count() > 1 {
                return Err(ConfigError::Node {
                    node_id: node.id.clone(),
                    reason: "key_hex, key_env and key_generate are mutually exclusive"
                        .to_string(),
                });
            }
        }
        Ok(())
    }

    /// Resolve every node's key and build the registry.
    pub fn build_registry(&self) -> Result<NodeRegistry, ConfigError> {
        self.validate()?;
        let mut registry = NodeRegistry::new();
        for entry in &self.nodes {
            let node = entry.build_node()?;
            registry.insert(node).map_err(|e| ConfigError::Node {
                node_id: entry.id.clone(),
                reason: e.to_string(),
            })?;
        }
        Ok(registry)
    }
}
