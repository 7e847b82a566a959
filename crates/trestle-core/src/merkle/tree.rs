//! Domain-separated binary Merkle tree construction.
//!
//! Leaf and internal-node digests use distinct SHA-256 input prefixes
//! (`0x00` / `0x01`). Without the split, an attacker who controls leaf
//! content could present a 64-byte concatenation of two child digests as
//! a "leaf" and have it hash to a legitimate internal node — the classic
//! second-preimage attack on unseparated Merkle trees.
//!
//! An odd node at any level is promoted unchanged to the next level and
//! paired on a later round (audit-tree construction). A single-leaf tree
//! therefore has a well-defined root: the leaf's own leaf digest.

use crate::merkle::proof::{MerkleProof, ProofError};
use sha2::{Digest, Sha256};

const LEAF_PREFIX: u8 = 0x00;
const NODE_PREFIX: u8 = 0x01;

/// Digest of a leaf value: `SHA256(0x00 ‖ leaf)`.
///
/// The only way to obtain one is [`LeafDigest::new`] over raw leaf bytes,
/// so no verifier code path can treat an internal-node digest as a leaf
/// digest or vice versa.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LeafDigest([u8; 32]);

impl LeafDigest {
    pub fn new(leaf: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update([LEAF_PREFIX]);
        hasher.update(leaf);
        LeafDigest(hasher.finalize().into())
    }

    pub fn into_inner(self) -> [u8; 32] {
        self.0
    }
}

/// Digest of an internal node: `SHA256(0x01 ‖ left ‖ right)`.
///
/// Only constructible from two child digests via [`NodeDigest::combine`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeDigest([u8; 32]);

impl NodeDigest {
    pub fn combine(left: &[u8; 32], right: &[u8; 32]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update([NODE_PREFIX]);
        hasher.update(left);
        hasher.update(right);
        NodeDigest(hasher.finalize().into())
    }

    pub fn into_inner(self) -> [u8; 32] {
        self.0
    }
}

/// Compute the Merkle root over an ordered, non-empty leaf sequence.
///
/// Deterministic and order-sensitive: the root is a pure function of the
/// leaf sequence, and permuting leaves changes it. Empty sequences never
/// reach this in normal operation (the range validator rejects empty
/// ranges first), but are an error rather than a panic.
pub fn root_from_leaves<L: AsRef<[u8]>>(leaves: &[L]) -> Result<[u8; 32], ProofError> {
    if leaves.is_empty() {
        return Err(ProofError::EmptyTree);
    }
    let mut level = leaf_digests(leaves);
    while level.len() > 1 {
        level = next_level(&level);
    }
    Ok(level[0])
}

/// Produce an inclusion proof for the leaf at `index`: the sibling path
/// up to the root, plus the tree size. Enough for an independent verifier
/// holding only the root to recompute it from the leaf value.
pub fn prove_index<L: AsRef<[u8]>>(leaves: &[L], index: u64) -> Result<MerkleProof, ProofError> {
    if leaves.is_empty() {
        return Err(ProofError::EmptyTree);
    }
    let total = leaves.len() as u64;
    if index >= total {
        return Err(ProofError::IndexOutOfBounds { index, total });
    }

    let mut level = leaf_digests(leaves);
    let mut pos = index as usize;
    let mut siblings = Vec::new();

    while level.len() > 1 {
        let sibling = pos ^ 1;
        if sibling < level.len() {
            siblings.push(level[sibling]);
        }
        // No sibling: `pos` is the promoted right-edge node this round.
        level = next_level(&level);
        pos /= 2;
    }

    Ok(MerkleProof {
        total,
        index,
        siblings,
    })
}

fn leaf_digests<L: AsRef<[u8]>>(leaves: &[L]) -> Vec<[u8; 32]> {
    leaves
        .iter()
        .map(|leaf| LeafDigest::new(leaf.as_ref()).into_inner())
        .collect()
}

fn next_level(level: &[[u8; 32]]) -> Vec<[u8; 32]> {
    let mut next = Vec::with_capacity(level.len().div_ceil(2));
    for pair in level.chunks(2) {
        if pair.len() == 2 {
            next.push(NodeDigest::combine(&pair[0], &pair[1]).into_inner());
        } else {
            // Odd node: promoted unchanged, not re-hashed.
            next.push(pair[0]);
        }
    }
    next
}
