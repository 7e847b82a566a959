//! Fixed-width byte encoding for bridge commitment leaves.
//!
//! The external verifier is a foreign contract that decodes leaves in
//! 32-byte words. Every number crossing that boundary is big-endian and
//! left-zero-padded to a full word; a leaf is exactly two words. The
//! encoding here must stay byte-for-byte compatible with that decoder —
//! the pinned-vector tests below are the contract.

use crate::types::{CommitmentLeaf, Height};
use thiserror::Error;

/// Width of one word of the foreign ABI.
pub const WORD_SIZE: usize = 32;

/// An encoded leaf is two words: padded height ‖ results hash.
pub const ENCODED_LEAF_SIZE: usize = 2 * WORD_SIZE;

/// Errors while encoding values for the foreign ABI. These indicate
/// either a caller error (oversized input) or upstream data corruption
/// (a results hash of unexpected length); neither occurs in a well-formed
/// chain.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodingError {
    #[error("cannot pad bytes because length of bytes array: {got} is greater than given length: {want}")]
    Oversize { got: usize, want: usize },

    #[error("results hash for height {height} is {got} bytes, expected {want}")]
    BadResultsHashLength {
        height: Height,
        got: usize,
        want: usize,
    },
}

/// Left-pad `input` with zero bytes to exactly `length` bytes.
///
/// Oversized input is always an error carrying both lengths — there is
/// deliberately no truncation path, because a silently cropped height or
/// hash would still verify locally while meaning something else to the
/// foreign decoder.
pub fn pad_bytes(input: &[u8], length: usize) -> Result<Vec<u8>, EncodingError> {
    if input.len() > length {
        return Err(EncodingError::Oversize {
            got: input.len(),
            want: length,
        });
    }
    let mut out = vec![0u8; length];
    out[length - input.len()..].copy_from_slice(input);
    Ok(out)
}

/// Serialize a height as one big-endian, left-zero-padded 32-byte word.
///
/// Total over all of `u64` — eight big-endian bytes always fit a word.
pub fn to_32_padded_bytes(number: Height) -> [u8; 32] {
    let mut out = [0u8; WORD_SIZE];
    out[WORD_SIZE - 8..].copy_from_slice(&number.to_be_bytes());
    out
}

/// Encode one commitment leaf as the 64-byte pre-image fed to the
/// commitment tree: `to_32_padded_bytes(height) ‖ last_results_hash`.
pub fn encode_leaf(leaf: &CommitmentLeaf) -> Result<Vec<u8>, EncodingError> {
    if leaf.last_results_hash.len() != WORD_SIZE {
        return Err(EncodingError::BadResultsHashLength {
            height: leaf.height,
            got: leaf.last_results_hash.len(),
            want: WORD_SIZE,
        });
    }
    let mut encoded = Vec::with_capacity(ENCODED_LEAF_SIZE);
    encoded.extend_from_slice(&to_32_padded_bytes(leaf.height));
    encoded.extend_from_slice(&leaf.last_results_hash);
    Ok(encoded)
}

/// Encode an ordered sequence of leaves. Order-preserving; fails on the
/// first malformed leaf.
pub fn encode_leaves(leaves: &[CommitmentLeaf]) -> Result<Vec<Vec<u8>>, EncodingError> {
    leaves.iter().map(encode_leaf).collect()
}
