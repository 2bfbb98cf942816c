use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use zksync_settlement_types::{StoredBatchInfo, H256};

/// Pending system contracts upgrade.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeState {
    /// Hash of the L2 upgrade transaction; zero if no upgrade is scheduled.
    pub tx_hash: H256,
    /// Number of the batch the upgrade transaction is committed in.
    pub batch_number: Option<u64>,
}

impl UpgradeState {
    /// Returns the upgrade transaction hash expected in the next committed batch, or zero.
    pub(crate) fn expected_tx_hash(&self) -> H256 {
        if self.batch_number.is_none() {
            self.tx_hash
        } else {
            H256::zero()
        }
    }
}

/// Persistent state of the batch executor.
///
/// Stored batch hashes form an arena indexed by the batch number. Reverting batches only moves
/// the counters backward; hashes of reverted batches stay in place until overwritten by a new commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorState {
    pub(crate) total_batches_committed: u64,
    pub(crate) total_batches_verified: u64,
    pub(crate) total_batches_executed: u64,
    pub(crate) stored_batch_hashes: Vec<H256>,
    pub(crate) l2_logs_tree_roots: BTreeMap<u64, H256>,
    pub(crate) upgrade: UpgradeState,
}

impl ExecutorState {
    /// Creates the state with the specified genesis batch stored at index 0.
    pub fn new(genesis_batch: &StoredBatchInfo) -> Self {
        Self {
            total_batches_committed: 0,
            total_batches_verified: 0,
            total_batches_executed: 0,
            stored_batch_hashes: vec![genesis_batch.hash()],
            l2_logs_tree_roots: BTreeMap::new(),
            upgrade: UpgradeState::default(),
        }
    }

    pub fn total_batches_committed(&self) -> u64 {
        self.total_batches_committed
    }

    pub fn total_batches_verified(&self) -> u64 {
        self.total_batches_verified
    }

    pub fn total_batches_executed(&self) -> u64 {
        self.total_batches_executed
    }

    /// Returns the stored hash for the specified batch. May return hashes of reverted batches.
    pub fn stored_batch_hash(&self, batch_number: u64) -> Option<H256> {
        let index = usize::try_from(batch_number).ok()?;
        self.stored_batch_hashes.get(index).copied()
    }

    /// Returns the L2-to-L1 logs tree root of an executed batch.
    pub fn l2_logs_tree_root(&self, batch_number: u64) -> Option<H256> {
        self.l2_logs_tree_roots.get(&batch_number).copied()
    }

    pub fn upgrade(&self) -> &UpgradeState {
        &self.upgrade
    }

    /// Checks whether `batch` hashes to the value stored for `batch_number`.
    pub(crate) fn is_stored(&self, batch_number: u64, batch: &StoredBatchInfo) -> bool {
        self.stored_batch_hash(batch_number) == Some(batch.hash())
    }

    pub(crate) fn store_batch_hash(&mut self, batch_number: u64, hash: H256) {
        let index = usize::try_from(batch_number).expect("batch number overflow");
        if index < self.stored_batch_hashes.len() {
            self.stored_batch_hashes[index] = hash;
        } else {
            assert_eq!(
                index,
                self.stored_batch_hashes.len(),
                "stored batch hashes must be contiguous"
            );
            self.stored_batch_hashes.push(hash);
        }
    }
}
