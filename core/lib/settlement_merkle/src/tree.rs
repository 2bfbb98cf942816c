//! In-memory Merkle tree over L2-to-L1 log leaves.

use std::{iter, ops::Range};

use zksync_settlement_crypto::hasher::{keccak::KeccakHasher, Hasher};
use zksync_settlement_types::{L2ToL1Log, H256};

/// Maximum supported depth of the tree. 32 corresponds to `2^32` elements in the tree.
const MAX_TREE_DEPTH: usize = 32;

/// Size of a tree leaf in bytes; leaves are serialized L2-to-L1 logs.
pub const LEAF_SIZE: usize = L2ToL1Log::SERIALIZED_SIZE;

/// In-memory Merkle tree of bounded depth (no more than 32).
///
/// The tree is left-leaning: if the tree size is larger than the number of leaves, the remaining
/// leaves are considered to equal `[0_u8; LEAF_SIZE]`. The tree grows by a factor of 2 when
/// the number of leaves exceeds its current size.
#[derive(Debug, Clone)]
pub struct MiniMerkleTree<H = KeccakHasher> {
    hasher: H,
    hashes: Vec<H256>,
    binary_tree_size: usize,
    empty_subtree_hashes: Vec<H256>,
}

impl MiniMerkleTree {
    /// Creates a new keccak-256 Merkle tree from the supplied leaves. If `min_tree_size` is supplied
    /// and is larger than the number of leaves, the tree is padded with empty leaves.
    ///
    /// # Panics
    ///
    /// Panics in the same situations as [`Self::from_hashes()`].
    pub fn new(leaves: impl Iterator<Item = [u8; LEAF_SIZE]>, min_tree_size: Option<usize>) -> Self {
        Self::with_hasher(KeccakHasher, leaves, min_tree_size)
    }
}

impl<H: Hasher<Hash = H256>> MiniMerkleTree<H> {
    /// Creates a new Merkle tree from the supplied leaves using the specified hasher.
    ///
    /// # Panics
    ///
    /// Panics in the same situations as [`Self::from_hashes()`].
    pub fn with_hasher(
        hasher: H,
        leaves: impl Iterator<Item = [u8; LEAF_SIZE]>,
        min_tree_size: Option<usize>,
    ) -> Self {
        let hashes: Vec<_> = leaves.map(|bytes| hasher.hash_bytes(&bytes)).collect();
        Self::from_hashes(hasher, hashes.into_iter(), min_tree_size)
    }

    /// Creates a new Merkle tree from the supplied leaf hashes.
    ///
    /// # Panics
    ///
    /// Panics if `min_tree_size` (if supplied) is not a power of 2, or if the number of leaves
    /// is greater than `2^32`.
    pub fn from_hashes(
        hasher: H,
        hashes: impl Iterator<Item = H256>,
        min_tree_size: Option<usize>,
    ) -> Self {
        let hashes: Vec<_> = hashes.collect();
        let mut binary_tree_size = hashes.len().next_power_of_two();
        if let Some(min_tree_size) = min_tree_size {
            assert!(
                min_tree_size.is_power_of_two(),
                "tree size must be a power of 2"
            );
            binary_tree_size = min_tree_size.max(binary_tree_size);
        }
        assert!(
            tree_depth_by_size(binary_tree_size) <= MAX_TREE_DEPTH,
            "Tree contains more than {} items; this is not supported",
            1_u64 << MAX_TREE_DEPTH
        );

        let empty_leaf_hash = hasher.hash_bytes(&[0_u8; LEAF_SIZE]);
        let empty_subtree_hashes = iter::successors(Some(empty_leaf_hash), |hash| {
            Some(hasher.compress(hash, hash))
        })
        .take(MAX_TREE_DEPTH + 1)
        .collect();

        Self {
            hasher,
            hashes,
            binary_tree_size,
            empty_subtree_hashes,
        }
    }

    /// Returns the number of non-empty leaves in the tree.
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    /// Returns `true` if the tree has no non-empty leaves.
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// Returns the tree depth, i.e. the length of Merkle paths.
    pub fn depth(&self) -> usize {
        tree_depth_by_size(self.binary_tree_size)
    }

    /// Returns the root hash of an empty subtree with the specified depth.
    pub fn empty_subtree_hash(&self, depth: usize) -> H256 {
        self.empty_subtree_hashes[depth]
    }

    /// Returns the root hash of this tree.
    pub fn merkle_root(&self) -> H256 {
        if self.hashes.is_empty() {
            return self.empty_subtree_hash(self.depth());
        }
        self.compute_merkle_root_and_paths(&mut [])
    }

    /// Returns the root hash and the Merkle path for a leaf with the specified 0-based `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside the tree.
    pub fn merkle_root_and_path(&self, index: usize) -> (H256, Vec<H256>) {
        assert!(index < self.binary_tree_size, "leaf index is outside the tree");
        let mut paths = [(index, vec![])];
        let root_hash = self.compute_merkle_root_and_paths(&mut paths);
        let [(_, path)] = paths;
        (root_hash, path)
    }

    /// Returns the root hash and the Merkle paths of the first and the last leaves in `range`.
    /// These paths form a proof for the entire range.
    ///
    /// # Panics
    ///
    /// Panics if `range` is empty or is not contained in the tree.
    pub fn merkle_root_and_paths_for_range(
        &self,
        range: Range<usize>,
    ) -> (H256, Vec<H256>, Vec<H256>) {
        assert!(!range.is_empty(), "range must not be empty");
        assert!(
            range.end <= self.binary_tree_size,
            "range is outside the tree"
        );
        let mut paths = [(range.start, vec![]), (range.end - 1, vec![])];
        let root_hash = self.compute_merkle_root_and_paths(&mut paths);
        let [(_, start_path), (_, end_path)] = paths;
        (root_hash, start_path, end_path)
    }

    /// Adds a leaf hash to the tree, replacing the leftmost empty leaf.
    /// If the tree is full, its size is doubled.
    pub fn push_hash(&mut self, leaf_hash: H256) {
        self.hashes.push(leaf_hash);
        if self.hashes.len() > self.binary_tree_size {
            self.binary_tree_size *= 2;
        }
    }

    /// Adds a new leaf to the tree, replacing the leftmost empty leaf.
    /// If the tree is full, its size is doubled.
    pub fn push(&mut self, leaf: [u8; LEAF_SIZE]) {
        let leaf_hash = self.hasher.hash_bytes(&leaf);
        self.push_hash(leaf_hash);
    }

    /// Computes the root hash, collecting Merkle paths for each `(index, path)` pair on the way.
    fn compute_merkle_root_and_paths(&self, paths: &mut [(usize, Vec<H256>)]) -> H256 {
        let depth = self.depth();
        for (_, path) in paths.iter_mut() {
            path.reserve(depth);
        }

        let mut hashes = self.hashes.clone();
        if hashes.is_empty() {
            hashes.push(self.empty_subtree_hash(0));
        }

        for level in 0..depth {
            if hashes.len() % 2 == 1 {
                hashes.push(self.empty_subtree_hash(level));
            }
            for (index, path) in paths.iter_mut() {
                let sibling = hashes
                    .get(*index ^ 1)
                    .copied()
                    .unwrap_or_else(|| self.empty_subtree_hash(level));
                path.push(sibling);
                *index /= 2;
            }

            let level_len = hashes.len() / 2;
            for i in 0..level_len {
                hashes[i] = self.hasher.compress(&hashes[2 * i], &hashes[2 * i + 1]);
            }
            hashes.truncate(level_len);
        }

        hashes[0]
    }
}

pub(crate) fn tree_depth_by_size(tree_size: usize) -> usize {
    debug_assert!(tree_size.is_power_of_two());
    tree_size.trailing_zeros() as usize
}
