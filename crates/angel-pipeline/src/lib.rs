//! # angel-pipeline — Identity Dispatch Orchestrator
//!
//! Sequences one identity through the verifiable core:
//!
//! ```text
//! fragments ─► reconstruct ─► fingerprint ─► prove ─► self-verify ─► node.process_identity
//!                                                                        │
//!                                                   enhance / render ◄───┘ (best effort)
//! ```
//!
//! A run yields a fingerprint, a proof and a node envelope together, or an
//! error and nothing else.
//!
//! ## Crate Policy
//!
//! - Nodes live in a [`NodeRegistry`] built once at startup and owned by
//!   the [`Pipeline`]. Each node sits behind its own lock.
//! - Decorative stages are injected through [`Enhancer`] and [`Renderer`].
//!   The defaults do nothing; [`AffineEnhancer`] and
//!   [`ProjectionRenderer`] are concrete alternatives.
//! - This crate emits `tracing` events and never installs a subscriber.

pub mod config;
pub mod orchestrator;
pub mod registry;
pub mod stages;

pub use config::{ConfigError, NodeConfig, PipelineConfig};
pub use orchestrator::{Pipeline, PipelineError, RunOutput};
pub use registry::NodeRegistry;
pub use stages::{
    AffineEnhancer, Enhancer, IdentityState, NoopEnhancer, NoopRenderer, ProjectionRenderer,
    RenderArtifact, RenderError, Renderer,
};
