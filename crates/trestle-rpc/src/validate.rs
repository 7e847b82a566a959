//! Height-range validation for commitment and proof requests.
//!
//! Runs before any block is loaded, against one snapshot of the chain
//! head. The error strings here are part of the external contract —
//! existing verifiers and integration suites match them verbatim, so
//! they must not be reworded.

use thiserror::Error;
use trestle_core::types::Height;

/// Maximum number of heights one commitment query may cover.
pub const MAX_RANGE: u64 = 1000;

/// A malformed or out-of-bound height range. Always produced before any
/// storage access beyond the chain head read.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("last block is smaller than first block")]
    EndBeforeStart,

    #[error("the first block is 0")]
    FirstBlockZero,

    #[error("the query exceeds the limit of allowed blocks {limit}")]
    ExceedsLimit { limit: u64 },

    #[error("cannot create the bridge commitments for an empty set of blocks")]
    EmptyRange,

    #[error("end block {end} is higher than current chain height {chain_height}")]
    BeyondChainHeight { end: Height, chain_height: Height },

    #[error("height {height} should be in the end exclusive interval first_block {first_block} last_block {last_block}")]
    HeightOutsideRange {
        height: Height,
        first_block: Height,
        last_block: Height,
    },
}

/// Validate the half-open range `[first, last)` against the chain head.
///
/// Checks run in a fixed order; the first failure wins. The head bound
/// permits `last == chain_height + 1`: `last` is exclusive, and the leaf
/// for the just-finalized height `chain_height` itself may be requested
/// retrospectively. Whether that leaf's results hash actually exists yet
/// is the block loader's call, not this function's — the bound is kept
/// loose deliberately so the loader stays the final authority on data
/// availability.
pub fn validate_range(first: Height, last: Height, chain_height: Height) -> Result<(), RangeError> {
    if last < first {
        return Err(RangeError::EndBeforeStart);
    }
    if first == 0 {
        return Err(RangeError::FirstBlockZero);
    }
    if last - first > MAX_RANGE {
        return Err(RangeError::ExceedsLimit { limit: MAX_RANGE });
    }
    if first == last {
        return Err(RangeError::EmptyRange);
    }
    if last > chain_height.saturating_add(1) {
        return Err(RangeError::BeyondChainHeight {
            end: last,
            chain_height,
        });
    }
    Ok(())
}

/// Validate an inclusion-proof target: the range itself, then that
/// `height` falls inside it.
///
/// The upper bound is strict — `height == last` is rejected even when
/// that block is loadable, because it lies outside the committed range
/// the caller asked to trust.
pub fn validate_inclusion_target(
    height: Height,
    first: Height,
    last: Height,
    chain_height: Height,
) -> Result<(), RangeError> {
    validate_range(first, last, chain_height)?;
    if height < first || height >= last {
        return Err(RangeError::HeightOutsideRange {
            height,
            first_block: first,
            last_block: last,
        });
    }
    Ok(())
}
