//! The per-block Merkle tree over transaction execution results.
//!
//! Each finalized block's ordered execution results are hashed into a
//! single root — the results hash — which the chain records in the
//! *following* block's header. The bridge commitment tree then commits to
//! those roots per height, which is what lets a composed proof chain a
//! single transaction result all the way to a commitment root.
//!
//! This tree reuses the commitment tree's domain-separated hashing and
//! proof shape (`merkle` module), so the verifier needs exactly one
//! `verify` routine for both levels.

use crate::merkle::proof::{MerkleProof, ProofError};
use crate::merkle::tree::{prove_index, root_from_leaves};
use serde::{Deserialize, Serialize};

/// The execution result of a single transaction, as finalized by the
/// application.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxResult {
    /// Application response code; 0 is success.
    pub code: u32,
    /// Opaque result payload returned by the application.
    pub data: Vec<u8>,
    /// Gas the transaction requested.
    pub gas_wanted: u64,
    /// Gas the transaction consumed.
    pub gas_used: u64,
}

impl TxResult {
    /// Deterministic wire form fed to the results tree: fixed-width
    /// big-endian scalars followed by the raw data payload.
    ///
    /// This byte layout is a hashing contract — the proof consumer must
    /// reproduce it exactly to verify a result against the results root,
    /// so it is pinned by literal-byte tests rather than derived from any
    /// serializer's defaults.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + 8 + 8 + self.data.len());
        out.extend_from_slice(&self.code.to_be_bytes());
        out.extend_from_slice(&self.gas_wanted.to_be_bytes());
        out.extend_from_slice(&self.gas_used.to_be_bytes());
        out.extend_from_slice(&self.data);
        out
    }
}

/// Merkle root over one block's ordered execution results.
pub fn results_hash(results: &[TxResult]) -> Result<[u8; 32], ProofError> {
    root_from_leaves(&encode_results(results))
}

/// Inclusion proof for the result at `index` against [`results_hash`] of
/// the same sequence.
pub fn prove_result(results: &[TxResult], index: u64) -> Result<MerkleProof, ProofError> {
    prove_index(&encode_results(results), index)
}

fn encode_results(results: &[TxResult]) -> Vec<Vec<u8>> {
    results.iter().map(TxResult::to_bytes).collect()
}
