//! Bridge commitment and inclusion-proof operations.
//!
//! The two entry points here back the node's `GetBridgeCommitment` and
//! `GetBridgeCommitmentInclusionProof` RPCs. Both follow the same
//! pipeline: snapshot the chain head once, validate the requested range
//! against it, then load leaves and build trees. A request either
//! completes with a full result or fails with a typed error — no partial
//! tree is ever returned.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use trestle_core::encoding::{encode_leaves, EncodingError};
use trestle_core::merkle::proof::ProofError;
use trestle_core::merkle::tree::{prove_index, root_from_leaves};
use trestle_core::results::{prove_result, results_hash};
use trestle_core::types::{
    hash_serde, CommitmentLeaf, Height, InclusionProofBundle, RESULTS_HASH_LOCATION_OFFSET,
};

use crate::store::{BlockStore, StateStore};
use crate::validate::{validate_inclusion_target, validate_range, RangeError};

/// Errors returned to RPC callers. Range errors always surface before
/// any block is loaded; load errors mean a height passed validation but
/// has no finalized data (pruned, or a race with head advancement).
/// Nothing here is retried internally — retry policy belongs to the
/// transport above.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Range(#[from] RangeError),

    #[error("couldn't load block {0}")]
    BlockNotFound(Height),

    #[error("couldn't load transaction results for height {0}")]
    ResultsNotFound(Height),

    #[error("transaction index {index} is out of bounds for the {count} results of height {height}")]
    TxIndexOutOfBounds {
        index: u64,
        count: usize,
        height: Height,
    },

    #[error("results hash computed for height {height} does not match the hash recorded in block {recorded_in}")]
    ResultsHashMismatch { height: Height, recorded_in: Height },

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Proof(#[from] ProofError),
}

/// Response to `GetBridgeCommitment`: the Merkle root over one height
/// range's encoded leaves. Meaningful only paired with the `[first, last)`
/// range it was requested for — roots of different ranges over the same
/// chain are unrelated values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeCommitment {
    #[serde(with = "hash_serde")]
    pub bridge_commitment: [u8; 32],
}

/// The query environment: the two storage collaborators every operation
/// reads from. Holds no mutable state of its own, so one environment can
/// serve any number of concurrent requests.
pub struct Environment<B, S> {
    block_store: B,
    state_store: S,
}

impl<B: BlockStore, S: StateStore> Environment<B, S> {
    pub fn new(block_store: B, state_store: S) -> Self {
        Environment {
            block_store,
            state_store,
        }
    }

    /// Build the bridge commitment for the half-open range `[first, last)`.
    pub fn bridge_commitment(
        &self,
        first: Height,
        last: Height,
    ) -> Result<BridgeCommitment, BridgeError> {
        let chain_height = self.block_store.height();
        validate_range(first, last, chain_height)?;

        let leaves = self.fetch_leaves(first, last)?;
        let encoded = encode_leaves(&leaves)?;
        let root = root_from_leaves(&encoded)?;

        debug!(first, last, root = %hex::encode(root), "built bridge commitment");
        Ok(BridgeCommitment {
            bridge_commitment: root,
        })
    }

    /// Build the composed inclusion proof for transaction `tx_index` of
    /// the execution results recorded at leaf `height`, within the
    /// commitment over `[first, last)`.
    ///
    /// The pipeline:
    /// 1. Validate the range and that `height` falls inside it.
    /// 2. Load the block at `height` — its header records the results
    ///    hash of the block executed one height earlier (see
    ///    [`RESULTS_HASH_LOCATION_OFFSET`]).
    /// 3. Build the results tree for that executed height, cross-check
    ///    its root against the recorded hash, and prove `tx_index` in it.
    /// 4. Rebuild the commitment tree over `[first, last)` and prove the
    ///    leaf at position `height - first`.
    ///
    /// The two proofs are verified independently by the consumer; there
    /// is no combined digest.
    pub fn bridge_commitment_inclusion_proof(
        &self,
        height: Height,
        tx_index: u64,
        first: Height,
        last: Height,
    ) -> Result<InclusionProofBundle, BridgeError> {
        let chain_height = self.block_store.height();
        validate_inclusion_target(height, first, last, chain_height)?;

        let block = self
            .block_store
            .load_block(height)
            .ok_or(BridgeError::BlockNotFound(height))?;

        // The header at `height` carries the results hash produced one
        // height earlier.
        let executed = height - RESULTS_HASH_LOCATION_OFFSET;
        let results = self
            .state_store
            .load_tx_results(executed)
            .ok_or(BridgeError::ResultsNotFound(executed))?;
        if tx_index >= results.len() as u64 {
            return Err(BridgeError::TxIndexOutOfBounds {
                index: tx_index,
                count: results.len(),
                height: executed,
            });
        }

        // Diverging storage would make the composed proof unverifiable
        // downstream; surface it here as a diagnosable error instead.
        let computed = results_hash(&results)?;
        if block.header.last_results_hash != computed {
            return Err(BridgeError::ResultsHashMismatch {
                height: executed,
                recorded_in: height,
            });
        }
        let last_results_merkle_proof = prove_result(&results, tx_index)?;

        let leaves = self.fetch_leaves(first, last)?;
        let encoded = encode_leaves(&leaves)?;
        let bridge_commitment_merkle_proof = prove_index(&encoded, height - first)?;

        debug!(height, tx_index, first, last, "built bridge commitment inclusion proof");
        Ok(InclusionProofBundle {
            last_results_merkle_proof,
            bridge_commitment_merkle_proof,
        })
    }

    /// Load one commitment leaf per height of `[first, last)`, ascending.
    ///
    /// Performs no range validation — the validator must have run first.
    /// Any missing block aborts the whole batch; there is no partial
    /// result.
    fn fetch_leaves(
        &self,
        first: Height,
        last: Height,
    ) -> Result<Vec<CommitmentLeaf>, BridgeError> {
        let mut leaves = Vec::with_capacity((last - first) as usize);
        for height in first..last {
            let block = self
                .block_store
                .load_block(height)
                .ok_or(BridgeError::BlockNotFound(height))?;
            leaves.push(CommitmentLeaf {
                height,
                last_results_hash: block.header.last_results_hash,
            });
        }
        Ok(leaves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemBlockStore, MemStateStore};
    use hex_literal::hex;
    use trestle_core::encoding::encode_leaf;
    use trestle_core::results::TxResult;
    use trestle_core::types::{Block, Header};

    fn block(height: Height, last_results_hash: Vec<u8>) -> Block {
        Block {
            header: Header {
                height,
                last_results_hash,
            },
        }
    }

    fn env_with(
        head: Height,
        blocks: Vec<Block>,
    ) -> Environment<MemBlockStore, MemStateStore> {
        let mut block_store = MemBlockStore::new(head);
        for b in blocks {
            block_store.put_block(b);
        }
        Environment::new(block_store, MemStateStore::new())
    }

    #[test]
    fn test_fetch_leaves() {
        let hash100 =
            hex!("63B766303EF0EA13BA3D9E281C2E498F76294FEDEEAA32E3D7F1B517BE9CD956").to_vec();
        let hash101 =
            hex!("2769641FA3FCF635E78A3DCDAA1FB88B6ED68369100E4E5C3703A54E834C08FE").to_vec();
        let env = env_with(
            1000,
            vec![block(100, hash100.clone()), block(101, hash101.clone())],
        );

        let leaves = env.fetch_leaves(100, 102).unwrap();
        assert_eq!(
            leaves,
            vec![
                CommitmentLeaf {
                    height: 100,
                    last_results_hash: hash100,
                },
                CommitmentLeaf {
                    height: 101,
                    last_results_hash: hash101,
                },
            ]
        );

        // A missing block aborts the whole batch.
        let err = env.fetch_leaves(100, 103).unwrap_err();
        assert_eq!(err.to_string(), "couldn't load block 102");
    }

    #[test]
    fn test_bridge_commitment_matches_foreign_decoder() {
        // Root computed independently by the foreign contract over the
        // same two leaves:
        //   leaf    = sha256(0x00 ‖ abi.encode(height, lastResultsHash))
        //   root    = sha256(0x01 ‖ leaf100 ‖ leaf101)
        let expected_root =
            hex!("6a9fc4ba63cc5a1bcc97fd79dc7304c64bd530d82d88fb4e4a234a35776be209");

        let env = env_with(
            1000,
            vec![
                block(
                    100,
                    hex!("2F082AF1B4E2E26251EC6F658AF6528BC8D28BA8AB1F89D0108E0CD8187D6006")
                        .to_vec(),
                ),
                block(
                    101,
                    hex!("52F3AC2AD13294B90F8B35B238A3F4B11707F18CD4DB0620A17EACE59C04DC89")
                        .to_vec(),
                ),
            ],
        );

        let result = env.bridge_commitment(100, 102).unwrap();
        assert_eq!(result.bridge_commitment, expected_root);
    }

    #[test]
    fn test_bridge_commitment_validates_before_loading() {
        // Empty store: a bad range must be reported as a range error, not
        // a load error.
        let env = env_with(100, vec![]);
        let err = env.bridge_commitment(5, 102).unwrap_err();
        assert_eq!(
            err.to_string(),
            "end block 102 is higher than current chain height 100"
        );
    }

    #[test]
    fn test_bridge_commitment_rejects_corrupt_results_hash() {
        let env = env_with(1000, vec![block(100, vec![0xAA; 31])]);
        let err = env.bridge_commitment(100, 101).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::Encoding(EncodingError::BadResultsHashLength {
                height: 100,
                got: 31,
                want: 32,
            })
        ));
    }

    fn results_h10() -> Vec<TxResult> {
        vec![
            TxResult {
                code: 0,
                data: b"one".to_vec(),
                gas_wanted: 0,
                gas_used: 0,
            },
            TxResult {
                code: 0,
                data: b"two".to_vec(),
                gas_wanted: 0,
                gas_used: 0,
            },
        ]
    }

    /// End-to-end composed proof: transactions executed at height 10,
    /// their results root recorded in block 11's header, committed over
    /// the single-leaf range [11, 12).
    #[test]
    fn test_inclusion_proof_end_to_end() {
        let results = results_h10();
        let results_root = results_hash(&results).unwrap();

        let mut block_store = MemBlockStore::new(20);
        block_store.put_block(block(11, results_root.to_vec()));
        let mut state_store = MemStateStore::new();
        state_store.put_tx_results(10, results.clone());
        let env = Environment::new(block_store, state_store);

        let commitment = env.bridge_commitment(11, 12).unwrap();
        let proofs = env.bridge_commitment_inclusion_proof(11, 1, 11, 12).unwrap();

        // First, the transaction result against the results root.
        assert!(proofs
            .last_results_merkle_proof
            .verify(&results_root, &results[1].to_bytes()));

        // Second, the encoded leaf against the commitment root.
        let leaf = encode_leaf(&CommitmentLeaf {
            height: 11,
            last_results_hash: results_root.to_vec(),
        })
        .unwrap();
        assert!(proofs
            .bridge_commitment_merkle_proof
            .verify(&commitment.bridge_commitment, &leaf));

        // A single-leaf commitment root is the leaf's own leaf digest.
        assert_eq!(
            commitment.bridge_commitment,
            trestle_core::merkle::tree::LeafDigest::new(&leaf).into_inner()
        );
    }

    /// Same scenario over a wider range, so the proven leaf sits in the
    /// middle of the commitment tree rather than being its root.
    #[test]
    fn test_inclusion_proof_multi_leaf_range() {
        let results = results_h10();
        let results_root = results_hash(&results).unwrap();

        let mut block_store = MemBlockStore::new(20);
        block_store.put_block(block(10, vec![0x0A; 32]));
        block_store.put_block(block(11, results_root.to_vec()));
        block_store.put_block(block(12, vec![0x0C; 32]));
        let mut state_store = MemStateStore::new();
        state_store.put_tx_results(10, results.clone());
        let env = Environment::new(block_store, state_store);

        let commitment = env.bridge_commitment(10, 13).unwrap();
        let proofs = env.bridge_commitment_inclusion_proof(11, 0, 10, 13).unwrap();

        assert_eq!(proofs.bridge_commitment_merkle_proof.total, 3);
        assert_eq!(proofs.bridge_commitment_merkle_proof.index, 1);

        assert!(proofs
            .last_results_merkle_proof
            .verify(&results_root, &results[0].to_bytes()));

        let leaf = encode_leaf(&CommitmentLeaf {
            height: 11,
            last_results_hash: results_root.to_vec(),
        })
        .unwrap();
        assert!(proofs
            .bridge_commitment_merkle_proof
            .verify(&commitment.bridge_commitment, &leaf));
    }

    #[test]
    fn test_queries_are_idempotent() {
        let results = results_h10();
        let results_root = results_hash(&results).unwrap();

        let mut block_store = MemBlockStore::new(20);
        block_store.put_block(block(11, results_root.to_vec()));
        let mut state_store = MemStateStore::new();
        state_store.put_tx_results(10, results);
        let env = Environment::new(block_store, state_store);

        assert_eq!(
            env.bridge_commitment(11, 12).unwrap(),
            env.bridge_commitment(11, 12).unwrap()
        );
        assert_eq!(
            env.bridge_commitment_inclusion_proof(11, 1, 11, 12).unwrap(),
            env.bridge_commitment_inclusion_proof(11, 1, 11, 12).unwrap()
        );
    }

    #[test]
    fn test_inclusion_proof_missing_block() {
        let env = env_with(20, vec![]);
        let err = env
            .bridge_commitment_inclusion_proof(11, 0, 11, 12)
            .unwrap_err();
        assert_eq!(err.to_string(), "couldn't load block 11");
    }

    #[test]
    fn test_inclusion_proof_missing_results() {
        let env = env_with(20, vec![block(11, vec![0xAB; 32])]);
        let err = env
            .bridge_commitment_inclusion_proof(11, 0, 11, 12)
            .unwrap_err();
        assert!(matches!(err, BridgeError::ResultsNotFound(10)));
    }

    #[test]
    fn test_inclusion_proof_tx_index_out_of_bounds() {
        let results = results_h10();
        let results_root = results_hash(&results).unwrap();

        let mut block_store = MemBlockStore::new(20);
        block_store.put_block(block(11, results_root.to_vec()));
        let mut state_store = MemStateStore::new();
        state_store.put_tx_results(10, results);
        let env = Environment::new(block_store, state_store);

        let err = env
            .bridge_commitment_inclusion_proof(11, 2, 11, 12)
            .unwrap_err();
        assert!(matches!(
            err,
            BridgeError::TxIndexOutOfBounds {
                index: 2,
                count: 2,
                height: 10,
            }
        ));
    }

    #[test]
    fn test_inclusion_proof_detects_results_hash_divergence() {
        let mut block_store = MemBlockStore::new(20);
        block_store.put_block(block(11, vec![0xEE; 32]));
        let mut state_store = MemStateStore::new();
        state_store.put_tx_results(10, results_h10());
        let env = Environment::new(block_store, state_store);

        let err = env
            .bridge_commitment_inclusion_proof(11, 0, 11, 12)
            .unwrap_err();
        assert!(matches!(
            err,
            BridgeError::ResultsHashMismatch {
                height: 10,
                recorded_in: 11,
            }
        ));
    }

    #[test]
    fn test_inclusion_proof_target_outside_range() {
        let env = env_with(1000, vec![]);
        let err = env
            .bridge_commitment_inclusion_proof(150, 0, 1, 100)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "height 150 should be in the end exclusive interval first_block 1 last_block 100"
        );
    }
}
