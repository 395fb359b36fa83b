//! # Secure Node
//!
//! Owns one node key and at most one outstanding envelope. The node
//! remembers the nonce of the envelope it handed out and opens nothing
//! else; once retrieved, an envelope is never opened again.

use angel_core::{CryptoError, NodeId, Signature, Timestamp};
use angel_crypto::{AeadNonce, NodeKey};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::envelope::Envelope;

// ─── State ───────────────────────────────────────────────────────────

/// Custody state of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeState {
    /// Holds its key, no pending payload.
    Idle,
    /// Has sealed one envelope that has not been retrieved yet.
    HoldingCiphertext,
}

impl std::fmt::Display for NodeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => f.write_str("IDLE"),
            Self::HoldingCiphertext => f.write_str("HOLDING_CIPHERTEXT"),
        }
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors from node custody operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    /// The signature could not be sealed: key absent or unusable.
    #[error("node {node_id}: encryption failed: {reason}")]
    Encryption {
        /// The node that failed.
        node_id: NodeId,
        /// What went wrong.
        reason: String,
    },

    /// The envelope could not be opened: wrong node, wrong key, or tampered.
    #[error("node {node_id}: decryption failed: {reason}")]
    Decryption {
        /// The node that failed.
        node_id: NodeId,
        /// What went wrong.
        reason: String,
    },

    /// `process_identity` was called while an envelope is outstanding.
    #[error("node {node_id} is {state}; retrieve the outstanding envelope first")]
    Busy {
        /// The busy node.
        node_id: NodeId,
        /// Its current state.
        state: NodeState,
    },
}

// ─── Transition log ──────────────────────────────────────────────────

/// Record of a node state transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeTransitionRecord {
    /// State before the transition.
    pub from_state: NodeState,
    /// State after the transition.
    pub to_state: NodeState,
    /// When the transition occurred.
    pub timestamp: Timestamp,
    /// Why the transition happened.
    pub reason: String,
}

// ─── Node ────────────────────────────────────────────────────────────

/// A named node holding one symmetric key used only for its own traffic.
pub struct SecureNode {
    id: NodeId,
    key: Option<NodeKey>,
    state: NodeState,
    /// Nonce of the outstanding envelope. `Some` exactly while holding.
    outstanding: Option<AeadNonce>,
    transitions: Vec<NodeTransitionRecord>,
}

impl SecureNode {
    /// Create an idle node with its provisioned key.
    pub fn new(id: NodeId, key: NodeKey) -> Self {
        Self {
            id,
            key: Some(key),
            state: NodeState::Idle,
            outstanding: None,
            transitions: Vec::new(),
        }
    }

    /// Create an idle node with no key. Every `process_identity` on it
    /// fails with [`NodeError::Encryption`] until it is rebuilt with one.
    pub fn unkeyed(id: NodeId) -> Self {
        Self {
            id,
            key: None,
            state: NodeState::Idle,
            outstanding: None,
            transitions: Vec::new(),
        }
    }

    /// The node's name.
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// Current custody state.
    pub fn state(&self) -> NodeState {
        self.state
    }

    /// Whether the node has key material.
    pub fn has_key(&self) -> bool {
        self.key.is_some()
    }

    /// Ordered log of every state transition.
    pub fn transitions(&self) -> &[NodeTransitionRecord] {
        &self.transitions
    }

    /// Seal `signature` for custody (IDLE → HOLDING_CIPHERTEXT).
    ///
    /// # Errors
    ///
    /// - `NodeError::Busy` if an envelope is already outstanding.
    /// - `NodeError::Encryption` if the key is absent or unusable; the node
    ///   stays `Idle`.
    pub fn process_identity(&mut self, signature: &Signature) -> Result<Envelope, NodeError> {
        self.require_idle()?;

        let key = self.key.as_ref().ok_or_else(|| NodeError::Encryption {
            node_id: self.id.clone(),
            reason: "no key provisioned".to_string(),
        })?;

        let (nonce, ciphertext) =
            angel_crypto::seal(key, signature.as_bytes(), self.id.as_str().as_bytes())
                .map_err(|e| NodeError::Encryption {
                    node_id: self.id.clone(),
                    reason: crypto_reason(e),
                })?;

        self.outstanding = Some(nonce);
        self.do_transition(NodeState::HoldingCiphertext, "identity sealed");
        Ok(Envelope {
            node_id: self.id.clone(),
            nonce,
            ciphertext,
        })
    }

    /// Open the outstanding envelope (any state → IDLE).
    ///
    /// The node returns to `Idle` whether or not decryption succeeds, and
    /// the outstanding envelope is released either way.
    ///
    /// # Errors
    ///
    /// `NodeError::Decryption` if the node holds no envelope, the envelope
    /// is addressed to another node, it is not the outstanding envelope
    /// (stale or replayed), the key is absent or does not match, or the
    /// ciphertext has been altered.
    pub fn retrieve(&mut self, envelope: &Envelope) -> Result<Signature, NodeError> {
        let result = self.open_envelope(envelope);
        let reason = match &result {
            Ok(_) => "identity retrieved",
            Err(_) => "retrieval failed",
        };
        self.outstanding = None;
        if self.state != NodeState::Idle {
            self.do_transition(NodeState::Idle, reason);
        }
        if let Err(e) = &result {
            tracing::warn!(node_id = %self.id, error = %e, "envelope retrieval failed");
        }
        result
    }

    fn open_envelope(&self, envelope: &Envelope) -> Result<Signature, NodeError> {
        if envelope.node_id != self.id {
            return Err(NodeError::Decryption {
                node_id: self.id.clone(),
                reason: format!("envelope is addressed to node {}", envelope.node_id),
            });
        }
        match &self.outstanding {
            None => {
                return Err(NodeError::Decryption {
                    node_id: self.id.clone(),
                    reason: "no envelope outstanding".to_string(),
                })
            }
            Some(nonce) if *nonce != envelope.nonce => {
                return Err(NodeError::Decryption {
                    node_id: self.id.clone(),
                    reason: "envelope is not the outstanding envelope".to_string(),
                })
            }
            Some(_) => {}
        }
        let key = self.key.as_ref().ok_or_else(|| NodeError::Decryption {
            node_id: self.id.clone(),
            reason: "no key provisioned".to_string(),
        })?;
        let plaintext = angel_crypto::open(
            key,
            &envelope.nonce,
            &envelope.ciphertext,
            self.id.as_str().as_bytes(),
        )
        .map_err(|e| NodeError::Decryption {
            node_id: self.id.clone(),
            reason: crypto_reason(e),
        })?;
        Ok(Signature::from_bytes(plaintext))
    }

    fn require_idle(&self) -> Result<(), NodeError> {
        if self.state != NodeState::Idle {
            return Err(NodeError::Busy {
                node_id: self.id.clone(),
                state: self.state,
            });
        }
        Ok(())
    }

    fn do_transition(&mut self, to: NodeState, reason: &str) {
        tracing::debug!(node_id = %self.id, from = %self.state, to = %to, reason, "node transition");
        self.transitions.push(NodeTransitionRecord {
            from_state: self.state,
            to_state: to,
            timestamp: Timestamp::now(),
            reason: reason.to_string(),
        });
        self.state = to;
    }
}

impl std::fmt::Debug for SecureNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureNode")
            .field("id", &self.id)
            .field("has_key", &self.has_key())
            .field("state", &self.state)
            .finish()
    }
}

/// Strip the crypto error's own prefix; the node error supplies one.
fn crypto_reason(e: CryptoError) -> String {
    match e {
        CryptoError::Encryption(r)
        | CryptoError::Decryption(r)
        | CryptoError::InvalidKey(r)
        | CryptoError::HexDecode(r) => r,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
