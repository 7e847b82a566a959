//! Merkle inclusion proofs and their verification.

use crate::merkle::tree::{LeafDigest, NodeDigest};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors during Merkle tree construction or proof generation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProofError {
    #[error("cannot build a merkle tree over an empty set of leaves")]
    EmptyTree,

    #[error("leaf index {index} is out of bounds for a tree of {total} leaves")]
    IndexOutOfBounds { index: u64, total: u64 },
}

/// A sibling-path witness from one leaf to the root.
///
/// Structurally identical for both trees in this engine (the per-block
/// results tree and the bridge commitment tree), so a single
/// [`MerkleProof::verify`] serves both.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    /// Number of leaves in the tree the proof was drawn from.
    pub total: u64,
    /// Position of the proven leaf, 0-indexed from the left.
    pub index: u64,
    /// Sibling digests, leaf level first. Levels where the proven node
    /// was the promoted right edge contribute no sibling.
    #[serde(with = "siblings_serde")]
    pub siblings: Vec<[u8; 32]>,
}

impl MerkleProof {
    /// Recompute the root from the raw leaf value and compare.
    ///
    /// The leaf value is hashed with the leaf prefix here, inside the
    /// verifier — callers never supply digests, so a node digest cannot
    /// be passed off as a leaf. The sibling list must be consumed
    /// exactly: a truncated proof or one with trailing garbage fails
    /// rather than succeeding on a prefix match.
    pub fn verify(&self, root: &[u8; 32], leaf_value: &[u8]) -> bool {
        if self.total == 0 || self.index >= self.total {
            return false;
        }

        let mut hash = LeafDigest::new(leaf_value).into_inner();
        let mut pos = self.index;
        let mut size = self.total;
        let mut siblings = self.siblings.iter();

        while size > 1 {
            if pos ^ 1 < size {
                let sibling = match siblings.next() {
                    Some(s) => s,
                    None => return false,
                };
                hash = if pos % 2 == 0 {
                    NodeDigest::combine(&hash, sibling)
                } else {
                    NodeDigest::combine(sibling, &hash)
                }
                .into_inner();
            }
            // Promoted right-edge node: carried up without a sibling.
            pos /= 2;
            size = size.div_ceil(2);
        }

        siblings.next().is_none() && hash == *root
    }
}

/// Serde helper rendering sibling digests as hex strings.
mod siblings_serde {
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(siblings: &[[u8; 32]], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(siblings.iter().map(hex::encode))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<[u8; 32]>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let strings = Vec::<String>::deserialize(deserializer)?;
        strings
            .into_iter()
            .map(|s| {
                let bytes = hex::decode(s.strip_prefix("0x").unwrap_or(&s))
                    .map_err(serde::de::Error::custom)?;
                if bytes.len() != 32 {
                    return Err(serde::de::Error::custom("sibling digest must be 32 bytes"));
                }
                let mut out = [0u8; 32];
                out.copy_from_slice(&bytes);
                Ok(out)
            })
            .collect()
    }
}
