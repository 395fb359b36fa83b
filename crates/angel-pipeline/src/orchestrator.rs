//! # Pipeline Orchestrator
//!
//! Runs one identity through reconstruction, fingerprinting, proof
//! generation, proof self-verification and node dispatch, in that order.
//! Any failure aborts the run before anything is returned.

use angel_core::{Fingerprint, Fragment, NodeId, Signature};
use angel_node::{Envelope, NodeError};
use angel_zkp::{CommitmentProofSystem, Proof, ProofError, ProofSystem};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::registry::NodeRegistry;
use crate::stages::{Enhancer, IdentityState, NoopEnhancer, NoopRenderer, Renderer};

/// Errors from pipeline operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// No node is registered under the target id.
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    /// A node with this id is already registered.
    #[error("duplicate node: {0}")]
    DuplicateNode(NodeId),

    /// The proof engine refused the witness.
    #[error("witness fingerprint {actual} does not match claimed fingerprint {claimed}")]
    WitnessMismatch {
        /// Fingerprint the proof was requested for.
        claimed: Fingerprint,
        /// Fingerprint of the witness.
        actual: Fingerprint,
    },

    /// A freshly generated proof did not verify against its own fingerprint.
    #[error("generated proof does not verify against fingerprint {fingerprint}")]
    ProofConsistency {
        /// The fingerprint the proof was generated for.
        fingerprint: Fingerprint,
    },

    /// The target node failed.
    #[error(transparent)]
    Node(#[from] NodeError),
}

impl From<ProofError> for PipelineError {
    fn from(e: ProofError) -> Self {
        match e {
            ProofError::WitnessMismatch { claimed, actual } => {
                Self::WitnessMismatch { claimed, actual }
            }
        }
    }
}

/// Everything a successful run produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutput<P = Proof> {
    /// SHA-256 fingerprint of the reconstructed signature.
    pub fingerprint: Fingerprint,
    /// Proof of knowledge of the signature, bound to `fingerprint`.
    pub proof: P,
    /// The signature sealed under the target node's key.
    pub envelope: Envelope,
}

/// The identity dispatch pipeline.
///
/// `Send + Sync`; share it behind an `Arc` to run identities from many
/// threads.
pub struct Pipeline<S = CommitmentProofSystem> {
    proofs: S,
    nodes: NodeRegistry,
    enhancer: Box<dyn Enhancer>,
    renderer: Box<dyn Renderer>,
}

impl Pipeline<CommitmentProofSystem> {
    /// Pipeline over `nodes` with the commitment proof engine and no-op
    /// decorative stages.
    pub fn new(nodes: NodeRegistry) -> Self {
        Self::with_proof_system(nodes, CommitmentProofSystem::new())
    }
}

impl<S: ProofSystem> Pipeline<S> {
    /// Pipeline over `nodes` with a caller-supplied proof engine.
    pub fn with_proof_system(nodes: NodeRegistry, proofs: S) -> Self {
        Self {
            proofs,
            nodes,
            enhancer: Box::new(NoopEnhancer),
            renderer: Box::new(NoopRenderer),
        }
    }

    pub fn with_enhancer(mut self, enhancer: impl Enhancer + 'static) -> Self {
        self.enhancer = Box::new(enhancer);
        self
    }

    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn nodes(&self) -> &NodeRegistry {
        &self.nodes
    }

    pub fn proof_system(&self) -> &S {
        &self.proofs
    }

    /// Verify and dispatch one identity to `target`.
    ///
    /// # Errors
    ///
    /// - `WitnessMismatch` if the proof engine rejects the witness.
    /// - `ProofConsistency` if the generated proof fails self-verification.
    /// - `UnknownNode` if `target` is not registered.
    /// - `Node` if the node cannot seal the signature (no key, or busy).
    pub fn run(
        &self,
        fragments: &[Fragment],
        target: &NodeId,
    ) -> Result<RunOutput<S::Proof>, PipelineError> {
        let result = self.run_inner(fragments, target);
        match &result {
            Ok(output) => tracing::info!(
                fingerprint = %output.fingerprint.to_hex(),
                node_id = %target,
                "identity dispatched"
            ),
            Err(e) => tracing::warn!(node_id = %target, error = %e, "identity run failed"),
        }
        result
    }

    fn run_inner(
        &self,
        fragments: &[Fragment],
        target: &NodeId,
    ) -> Result<RunOutput<S::Proof>, PipelineError> {
        let signature = angel_crypto::reconstruct(fragments);
        tracing::debug!(fragments = fragments.len(), bytes = signature.len(), "signature reconstructed");

        let fingerprint = angel_crypto::verify(&signature);
        tracing::debug!(fingerprint = %fingerprint, "fingerprint computed");

        let proof = self.proofs.generate_proof(&fingerprint, &signature)?;
        tracing::debug!(fingerprint = %fingerprint, "proof generated");

        if !self.proofs.verify_proof(&proof, &fingerprint) {
            return Err(PipelineError::ProofConsistency { fingerprint });
        }
        tracing::debug!(fingerprint = %fingerprint, "proof self-verified");

        let node = self
            .nodes
            .get(target)
            .ok_or_else(|| PipelineError::UnknownNode(target.clone()))?;
        let envelope = node.lock().process_identity(&signature)?;
        tracing::debug!(node_id = %target, ciphertext_len = envelope.ciphertext.len(), "identity sealed");

        self.decorate(&signature);

        Ok(RunOutput {
            fingerprint,
            proof,
            envelope,
        })
    }

    /// Best-effort enhance and render. Never fails the run.
    fn decorate(&self, signature: &Signature) {
        let state = self.enhancer.enhance(IdentityState::from_signature(signature));
        tracing::debug!(dimension = state.dimension(), "identity state enhanced");

        match self.renderer.render(signature) {
            Ok(artifact) => {
                tracing::debug!(kind = %artifact.kind, values = artifact.values.len(), "identity rendered")
            }
            Err(e) => tracing::warn!(error = %e, "render stage failed; continuing"),
        }
    }

    /// Return an envelope to the node it is addressed to and recover the
    /// signature. The node is `Idle` afterwards whatever the outcome.
    ///
    /// # Errors
    ///
    /// `UnknownNode` if the addressee is not registered; `Node` if
    /// decryption fails.
    pub fn retrieve(&self, envelope: &Envelope) -> Result<Signature, PipelineError> {
        let node = self
            .nodes
            .get(&envelope.node_id)
            .ok_or_else(|| PipelineError::UnknownNode(envelope.node_id.clone()))?;
        let signature = node.lock().retrieve(envelope)?;
        tracing::debug!(node_id = %envelope.node_id, "identity retrieved");
        Ok(signature)
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for Pipeline<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("proofs", &self.proofs)
            .field("nodes", &self.nodes)
            .finish_non_exhaustive()
    }
}
