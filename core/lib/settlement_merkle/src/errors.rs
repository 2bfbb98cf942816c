use zksync_settlement_types::U256;

/// Error returned when a Merkle proof is structurally invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MerkleError {
    #[error("Merkle path is empty")]
    EmptyProof,
    #[error("Merkle path has {len} items, while the tree height is limited by {max}")]
    ProofTooLong { len: usize, max: usize },
    #[error("leaf index {index} does not fit into a tree of height {height}")]
    IndexTooLarge { index: U256, height: usize },
    #[error("range proof paths have different lengths: start path {start}, end path {end}")]
    PathLengthMismatch { start: usize, end: usize },
    #[error("range proof paths are empty")]
    EmptyPaths,
    #[error("range proof has no leaves to prove")]
    NothingToProve,
    #[error("range starting at {start_index} with {leaf_count} leaves does not fit into a tree of height {height}")]
    IndexHeightMismatch {
        start_index: U256,
        leaf_count: usize,
        height: usize,
    },
}
