//! # Node Registry
//!
//! Name-to-node table built at startup. The table itself is immutable once
//! handed to a [`Pipeline`](crate::Pipeline); each node has its own
//! `parking_lot::Mutex`, so dispatches to one node serialize while
//! dispatches to different nodes share no lock.

use std::collections::BTreeMap;

use angel_core::NodeId;
use angel_node::{NodeState, SecureNode};
use parking_lot::Mutex;

use crate::orchestrator::PipelineError;

/// Registry of secure nodes keyed by name.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    nodes: BTreeMap<NodeId, Mutex<SecureNode>>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node under its own id.
    ///
    /// # Errors
    ///
    /// `PipelineError::DuplicateNode` if a node with that id exists. The
    /// registry is unchanged.
    pub fn insert(&mut self, node: SecureNode) -> Result<(), PipelineError> {
        let id = node.id().clone();
        if self.nodes.contains_key(&id) {
            return Err(PipelineError::DuplicateNode(id));
        }
        tracing::debug!(node_id = %id, has_key = node.has_key(), "node registered");
        self.nodes.insert(id, Mutex::new(node));
        Ok(())
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_node(mut self, node: SecureNode) -> Result<Self, PipelineError> {
        self.insert(node)?;
        Ok(self)
    }

    pub fn get(&self, id: &NodeId) -> Option<&Mutex<SecureNode>> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Registered ids in sorted order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().cloned().collect()
    }

    /// Current custody state of a node, or `None` if it is not registered.
    pub fn state_of(&self, id: &NodeId) -> Option<NodeState> {
        self.nodes.get(id).map(|node| node.lock().state())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
