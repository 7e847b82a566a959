use crate::merkle::proof::MerkleProof;
use serde::{Deserialize, Serialize};

/// Block height. 1-indexed and strictly increasing with the chain;
/// height 0 is never a valid block.
pub type Height = u64;

/// The results hash for the transactions executed at height `h` is stored
/// in the header of block `h + RESULTS_HASH_LOCATION_OFFSET`. Headers
/// always carry the *previous* block's results hash, never their own —
/// the results of a block only exist once that block has executed, which
/// is after its own header was built.
///
/// This is a protocol-level indexing relationship; keep it named so it can
/// be revisited if the chain protocol ever changes.
pub const RESULTS_HASH_LOCATION_OFFSET: Height = 1;

/// The subset of a block header this engine reads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Height of the block carrying this header.
    pub height: Height,
    /// Root of the Merkle tree over the transaction execution results of
    /// the block at `height - RESULTS_HASH_LOCATION_OFFSET`.
    ///
    /// Carried as raw bytes rather than a fixed array: storage hands this
    /// back uninterpreted, and the leaf encoder is the gate that enforces
    /// the 32-byte length.
    pub last_results_hash: Vec<u8>,
}

/// A finalized block, as loaded from the block store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub header: Header,
}

/// One leaf of the bridge commitment tree: a height paired with the
/// results hash the chain recorded for it (see
/// [`RESULTS_HASH_LOCATION_OFFSET`] for where that hash lives).
///
/// Leaves are derived data — recomputed on demand from the block store,
/// never persisted — and immutable once constructed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitmentLeaf {
    pub height: Height,
    pub last_results_hash: Vec<u8>,
}

/// The two chained proofs connecting one transaction result to a bridge
/// commitment root.
///
/// A consumer verifies them independently: the serialized transaction
/// result against the results-tree root using `last_results_merkle_proof`,
/// and the encoded `(height, results root)` leaf against the commitment
/// root using `bridge_commitment_merkle_proof`. There is no single
/// combined digest check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusionProofBundle {
    /// Proves the transaction result inside its block's results tree.
    pub last_results_merkle_proof: MerkleProof,
    /// Proves the results-hash leaf inside the commitment tree.
    pub bridge_commitment_merkle_proof: MerkleProof,
}

/// Serde helper rendering a 32-byte digest as a hex string.
pub mod hash_serde {
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(hash: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(hash))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[u8; 32], D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let s = s.strip_prefix("0x").unwrap_or(&s);
        let bytes = hex::decode(s).map_err(serde::de::Error::custom)?;
        if bytes.len() != 32 {
            return Err(serde::de::Error::custom("digest must be 32 bytes"));
        }
        let mut out = [0u8; 32];
        out.copy_from_slice(&bytes);
        Ok(out)
    }
}
