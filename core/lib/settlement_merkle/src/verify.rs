//! Root recomputation from Merkle proofs.

use zksync_settlement_crypto::hasher::{keccak::KeccakHasher, Hasher};
use zksync_settlement_types::{H256, U256};

use crate::MerkleError;

/// Maximum supported height of a verified tree; indices are 256-bit.
pub const MAX_TREE_HEIGHT: usize = 256;

/// Recomputes the root of a tree from a leaf hash, its 0-based `index` and the Merkle `path`
/// (sibling hashes ordered from the leaf level up). The tree height equals the path length.
///
/// # Errors
///
/// Returns an error if the path is empty, longer than [`MAX_TREE_HEIGHT`], or if `index`
/// does not fit into a tree of the path height.
pub fn calculate_root(path: &[H256], index: U256, leaf_hash: H256) -> Result<H256, MerkleError> {
    let height = path.len();
    if height == 0 {
        return Err(MerkleError::EmptyProof);
    }
    if height > MAX_TREE_HEIGHT {
        return Err(MerkleError::ProofTooLong {
            len: height,
            max: MAX_TREE_HEIGHT,
        });
    }
    if index.bits() > height {
        return Err(MerkleError::IndexTooLarge { index, height });
    }

    let hasher = KeccakHasher;
    let root = path
        .iter()
        .enumerate()
        .fold(leaf_hash, |current, (level, sibling)| {
            if index.bit(level) {
                hasher.compress(sibling, &current)
            } else {
                hasher.compress(&current, sibling)
            }
        });
    Ok(root)
}

/// Recomputes the root of a tree from a contiguous range of leaf hashes starting at `start_index`.
///
/// `start_path` is the Merkle path of the first leaf in the range, and `end_path` is the path
/// of the last leaf; their length is the tree height. On each level, only the left neighbor of
/// the leftmost node and the right neighbor of the rightmost node are taken from the paths;
/// all other nodes are computed from the range itself.
///
/// # Errors
///
/// Returns an error if paths are empty, have different lengths or exceed [`MAX_TREE_HEIGHT`],
/// if there are no leaves, or if the range does not fit into a tree of the path height.
pub fn calculate_root_for_range(
    start_path: &[H256],
    end_path: &[H256],
    start_index: U256,
    leaf_hashes: &[H256],
) -> Result<H256, MerkleError> {
    let height = start_path.len();
    if height != end_path.len() {
        return Err(MerkleError::PathLengthMismatch {
            start: height,
            end: end_path.len(),
        });
    }
    if height == 0 {
        return Err(MerkleError::EmptyPaths);
    }
    if height > MAX_TREE_HEIGHT {
        return Err(MerkleError::ProofTooLong {
            len: height,
            max: MAX_TREE_HEIGHT,
        });
    }
    if leaf_hashes.is_empty() {
        return Err(MerkleError::NothingToProve);
    }

    let height_mismatch = || MerkleError::IndexHeightMismatch {
        start_index,
        leaf_count: leaf_hashes.len(),
        height,
    };
    let last_index = start_index
        .checked_add(U256::from(leaf_hashes.len() - 1))
        .ok_or_else(height_mismatch)?;
    if last_index.bits() > height {
        return Err(height_mismatch());
    }

    let hasher = KeccakHasher;
    let mut hashes = leaf_hashes.to_vec();
    let mut level_len = hashes.len();
    let mut level_start = start_index;
    for level in 0..height {
        let parity = usize::from(level_start.bit(0));
        // The last node of the level is a left child iff `start + len` is odd.
        let ends_with_left_child = (parity + level_len) % 2 == 1;
        let next_level_len = level_len / 2 + (parity | (level_len % 2));

        for i in 0..next_level_len {
            let lhs = if i == 0 && parity == 1 {
                start_path[level]
            } else {
                hashes[2 * i - parity]
            };
            let rhs = if i == next_level_len - 1 && ends_with_left_child {
                end_path[level]
            } else {
                hashes[2 * i + 1 - parity]
            };
            hashes[i] = hasher.compress(&lhs, &rhs);
        }

        level_len = next_level_len;
        level_start = level_start / 2_u64;
    }
    Ok(hashes[0])
}
