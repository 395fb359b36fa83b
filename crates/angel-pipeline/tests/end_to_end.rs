//! End-to-end runs through a pipeline built from configuration.

use std::sync::Arc;

use angel_core::{Fingerprint, Fragment, NodeId, Signature};
use angel_crypto::NodeKey;
use angel_node::{NodeError, NodeState, SecureNode};
use angel_pipeline::{NodeRegistry, Pipeline, PipelineConfig, PipelineError};
use angel_zkp::{CommitmentProofSystem, NonceRegistry, Proof, ProofSystem};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn id(s: &str) -> NodeId {
    NodeId::new(s).unwrap()
}

fn fragments(parts: &[&str]) -> Vec<Fragment> {
    parts.iter().map(|p| Fragment::from(*p)).collect()
}

fn three_node_pipeline() -> Pipeline {
    let yaml = format!(
        "nodes:\n  - id: A1\n    key_hex: \"{}\"\n  - id: B7\n    key_hex: \"{}\"\n  - id: C2\n",
        "a1".repeat(32),
        "b7".repeat(32)
    );
    let registry = PipelineConfig::from_yaml_str(&yaml)
        .unwrap()
        .build_registry()
        .unwrap();
    Pipeline::new(registry)
}

#[test]
fn alpha_identity_dispatches_to_a1() {
    init_tracing();
    let pipeline = three_node_pipeline();
    let out = pipeline
        .run(&fragments(&["id-", "alpha", "-001"]), &id("A1"))
        .unwrap();

    assert_eq!(
        out.fingerprint.to_hex(),
        "1ab036bce906760e91fcfe30ba6651a7f34f408376147422a89a44614d7c7c8d"
    );
    let engine = CommitmentProofSystem::new();
    assert!(engine.verify_proof(&out.proof, &out.fingerprint));

    let other = angel_crypto::verify(&Signature::from_bytes(b"id-alpha-002".to_vec()));
    assert!(!engine.verify_proof(&out.proof, &other));

    assert_eq!(
        pipeline.retrieve(&out.envelope).unwrap().as_bytes(),
        b"id-alpha-001"
    );
}

#[test]
fn empty_fragments_fingerprint_empty_input() {
    let pipeline = three_node_pipeline();
    let out = pipeline.run(&[], &id("B7")).unwrap();
    assert_eq!(
        out.fingerprint.to_hex(),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
    assert!(pipeline.retrieve(&out.envelope).unwrap().is_empty());
}

#[test]
fn fragment_order_matters() {
    let pipeline = three_node_pipeline();
    let forward = pipeline
        .run(&fragments(&["layer1", "layer2", "layer3"]), &id("A1"))
        .unwrap();
    let reversed = pipeline
        .run(&fragments(&["layer3", "layer2", "layer1"]), &id("B7"))
        .unwrap();
    assert_eq!(
        forward.fingerprint.to_hex(),
        "705ab54a36ba11ccc4da4a155c7b65a01738489d83c0e1469f0d963e48fdba51"
    );
    assert_ne!(forward.fingerprint, reversed.fingerprint);
}

#[test]
fn unknown_node_leaves_registry_untouched() {
    let pipeline = three_node_pipeline();
    let err = pipeline
        .run(&fragments(&["id-", "alpha", "-001"]), &id("Q0"))
        .unwrap_err();
    assert_eq!(err, PipelineError::UnknownNode(id("Q0")));
    for node in pipeline.nodes().node_ids() {
        assert_eq!(pipeline.nodes().state_of(&node), Some(NodeState::Idle));
    }
}

#[test]
fn envelope_cannot_be_opened_by_another_node() {
    let pipeline = three_node_pipeline();
    let out = pipeline
        .run(&fragments(&["id-", "beta", "-001"]), &id("B7"))
        .unwrap();

    let mut forged = out.envelope.clone();
    forged.node_id = id("A1");
    let err = pipeline.retrieve(&forged).unwrap_err();
    assert!(matches!(err, PipelineError::Node(NodeError::Decryption { .. })));
    assert_eq!(pipeline.nodes().state_of(&id("A1")), Some(NodeState::Idle));

    assert_eq!(
        pipeline.retrieve(&out.envelope).unwrap().as_bytes(),
        b"id-beta-001"
    );
}

#[test]
fn envelope_opens_once() {
    let pipeline = three_node_pipeline();
    let first = pipeline
        .run(&fragments(&["id-", "alpha", "-001"]), &id("A1"))
        .unwrap();
    pipeline.retrieve(&first.envelope).unwrap();
    let replay = pipeline.retrieve(&first.envelope).unwrap_err();
    assert!(matches!(replay, PipelineError::Node(NodeError::Decryption { .. })));

    let second = pipeline
        .run(&fragments(&["id-", "alpha", "-002"]), &id("A1"))
        .unwrap();
    let stale = pipeline.retrieve(&first.envelope).unwrap_err();
    assert!(matches!(stale, PipelineError::Node(NodeError::Decryption { .. })));
    assert_eq!(pipeline.nodes().state_of(&id("A1")), Some(NodeState::Idle));
    assert!(pipeline.retrieve(&second.envelope).is_err());
}

#[test]
fn unkeyed_node_produces_no_output() {
    let pipeline = three_node_pipeline();
    let err = pipeline
        .run(&fragments(&["id-", "alpha", "-001"]), &id("C2"))
        .unwrap_err();
    assert!(matches!(err, PipelineError::Node(NodeError::Encryption { .. })));
    assert_eq!(pipeline.nodes().state_of(&id("C2")), Some(NodeState::Idle));
}

#[test]
fn output_serializes_without_witness() {
    let pipeline = three_node_pipeline();
    let out = pipeline
        .run(&fragments(&["id-", "alpha", "-001"]), &id("A1"))
        .unwrap();
    let json = serde_json::to_string(&out).unwrap();
    assert!(!json.contains("id-alpha-001"));
    assert!(!json.contains(&hex_of(b"id-alpha-001")));

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let proof: Proof = serde_json::from_value(value["proof"].clone()).unwrap();
    let fingerprint: Fingerprint = serde_json::from_value(value["fingerprint"].clone()).unwrap();
    assert!(CommitmentProofSystem::new().verify_proof(&proof, &fingerprint));
    assert!(CommitmentProofSystem::new()
        .verify_encoded(&value["proof"].to_string(), &out.fingerprint));
}

#[test]
fn replay_registry_is_opt_in() {
    let pipeline = three_node_pipeline();
    let out = pipeline
        .run(&fragments(&["id-", "alpha", "-001"]), &id("A1"))
        .unwrap();
    let seen = NonceRegistry::new();
    seen.consume(&out.proof).unwrap();
    assert!(seen.consume(&out.proof).is_err());
    assert!(CommitmentProofSystem::new().verify_proof(&out.proof, &out.fingerprint));
}

#[test]
fn concurrent_runs_on_distinct_nodes() {
    let mut registry = NodeRegistry::new();
    let names: Vec<NodeId> = (0..8).map(|i| id(&format!("N{i}"))).collect();
    for name in &names {
        registry
            .insert(SecureNode::new(name.clone(), NodeKey::generate()))
            .unwrap();
    }
    let pipeline = Arc::new(Pipeline::new(registry));

    let handles: Vec<_> = names
        .iter()
        .cloned()
        .map(|name| {
            let pipeline = Arc::clone(&pipeline);
            std::thread::spawn(move || {
                let payload = format!("identity-for-{name}");
                let out = pipeline
                    .run(&[Fragment::from(payload.as_str())], &name)
                    .unwrap();
                let back = pipeline.retrieve(&out.envelope).unwrap();
                assert_eq!(back.as_bytes(), payload.as_bytes());
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    for name in &names {
        assert_eq!(pipeline.nodes().state_of(name), Some(NodeState::Idle));
    }
}

#[test]
fn concurrent_runs_on_one_node_admit_one() {
    let registry = NodeRegistry::new()
        .with_node(SecureNode::new(id("A1"), NodeKey::generate()))
        .unwrap();
    let pipeline = Arc::new(Pipeline::new(registry));

    let handles: Vec<_> = (0..6)
        .map(|i| {
            let pipeline = Arc::clone(&pipeline);
            std::thread::spawn(move || {
                pipeline
                    .run(&[Fragment::from(format!("id-{i}").as_str())], &id("A1"))
                    .is_ok()
            })
        })
        .collect();
    let admitted = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();
    assert_eq!(admitted, 1);
    assert_eq!(
        pipeline.nodes().state_of(&id("A1")),
        Some(NodeState::HoldingCiphertext)
    );
}

fn hex_of(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
