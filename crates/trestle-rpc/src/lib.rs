//! # Trestle RPC
//!
//! The query layer exposing bridge commitments and inclusion proofs over
//! the node's finalized storage.
//!
//! Everything here is a synchronous, read-only query: finalized blocks
//! and execution results are append-only and immutable, so concurrent
//! requests need no coordination. The only shared mutable quantity is
//! the chain head height, which each request snapshots exactly once
//! before validating its range — a request never observes the head
//! advancing mid-computation.
//!
//! The actual transport (HTTP, gRPC, …) lives above this crate; the
//! operations on [`bridge::Environment`] are transport-agnostic and
//! return either a complete result or a typed error, never a partial
//! tree.

pub mod bridge;
pub mod store;
pub mod validate;

pub use bridge::{BridgeCommitment, BridgeError, Environment};
pub use store::{BlockStore, MemBlockStore, MemStateStore, StateStore};
pub use validate::{validate_inclusion_target, validate_range, RangeError, MAX_RANGE};
