//! # Trestle Core
//!
//! Bridge commitment and inclusion-proof logic for the Trestle node.
//!
//! This crate contains **no storage access** and **no transport code**.
//! Everything here is a deterministic function of its inputs — given the
//! same leaves, it always produces the same commitment root, and a proof
//! either recomputes the root or it doesn't.
//!
//! ## What a bridge commitment is
//!
//! The node periodically commits to a contiguous range of finalized block
//! heights. Each leaf pairs a height with the execution-results hash the
//! chain recorded for it, encoded in 32-byte words so an independently
//! implemented foreign contract can decode it without sharing any code
//! with this node. The Merkle root over those leaves is the bridge
//! commitment; an external verifier trusts only that root (plus consensus
//! signatures over it, out of scope here) and checks inclusion proofs
//! against it.
//!
//! ## Trust Model
//!
//! - **Leaf encoding** (`encoding` module): byte-exact against the foreign
//!   decoder. Oversized inputs are errors, never truncated.
//! - **Merkle hashing** (`merkle` module): SHA-256 with domain-separated
//!   leaf/node prefixes, so a proof cannot pass off an internal node as a
//!   leaf or vice versa.
//! - **Results hashing** (`results` module): the per-block tree over
//!   transaction execution results shares the same proof shape, so one
//!   verification routine serves both trees.

pub mod encoding;
pub mod merkle;
pub mod results;
pub mod types;

// Re-export commonly used items for convenience
pub use encoding::{encode_leaf, encode_leaves, pad_bytes, to_32_padded_bytes, EncodingError};
pub use merkle::{
    proof::{MerkleProof, ProofError},
    tree::{prove_index, root_from_leaves, LeafDigest, NodeDigest},
};
pub use results::{prove_result, results_hash, TxResult};
pub use types::*;
