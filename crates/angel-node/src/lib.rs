//! # angel-node — Secure Processing Nodes
//!
//! A node takes custody of a verified signature by sealing it under its own
//! key, and hands it back only when presented with an envelope it sealed.
//!
//! ## State Machine
//!
//! ```text
//!            process_identity (ok)
//!   Idle ─────────────────────────▶ HoldingCiphertext
//!    ▲                                     │
//!    └──────── retrieve (ok or err) ───────┘
//! ```
//!
//! - `process_identity` is only accepted in `Idle`. A failed encryption
//!   leaves the node in `Idle`.
//! - `retrieve` always ends in `Idle`, whether decryption succeeds or not.
//! - Every transition is appended to the node's transition log.
//!
//! Nodes are driven through `&mut self`. Sharing one across threads needs
//! an external lock; the pipeline keeps one `Mutex` per node.

pub mod envelope;
pub mod node;

pub use envelope::Envelope;
pub use node::{NodeError, NodeState, NodeTransitionRecord, SecureNode};
