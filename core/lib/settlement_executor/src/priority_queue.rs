//! Priority operations queue and the rolling hash of the operations processed in a batch.

use std::{collections::VecDeque, fmt};

use serde::{Deserialize, Serialize};
use zksync_settlement_types::{
    keccak256, PriorityOpId, PriorityOperation, EMPTY_STRING_KECCAK, H256, U256,
};

use crate::errors::PriorityQueueError;

/// FIFO queue of L1-originated operations.
pub trait PriorityQueue: fmt::Debug + Send + Sync {
    /// Removes the first operation from the queue.
    fn pop_front(&mut self) -> Result<PriorityOperation, PriorityQueueError>;
}

/// In-memory priority queue. Operation IDs are assigned sequentially and are never reused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryPriorityQueue {
    operations: VecDeque<PriorityOperation>,
    first_unprocessed: PriorityOpId,
}

impl InMemoryPriorityQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of operations ever added to the queue.
    pub fn total_priority_txs(&self) -> u64 {
        self.first_unprocessed.0 + self.operations.len() as u64
    }

    /// ID of the first operation that is not yet processed.
    pub fn first_unprocessed_priority_tx(&self) -> PriorityOpId {
        self.first_unprocessed
    }

    /// Number of pending operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn front(&self) -> Option<&PriorityOperation> {
        self.operations.front()
    }

    /// Appends an operation to the queue, assigning it the next ID.
    pub fn push_back(&mut self, mut operation: PriorityOperation) -> PriorityOpId {
        let id = PriorityOpId(self.total_priority_txs());
        operation.id = id;
        self.operations.push_back(operation);
        id
    }
}

impl PriorityQueue for InMemoryPriorityQueue {
    fn pop_front(&mut self) -> Result<PriorityOperation, PriorityQueueError> {
        let operation = self
            .operations
            .pop_front()
            .ok_or(PriorityQueueError::Empty)?;
        self.first_unprocessed = self.first_unprocessed.next();
        Ok(operation)
    }
}

/// Pops `count` operations from `queue` and returns their rolling hash, starting from
/// `keccak256("")` and folding in each canonical transaction hash.
pub fn collect_priority_operations<Q: PriorityQueue + ?Sized>(
    queue: &mut Q,
    count: U256,
) -> Result<H256, PriorityQueueError> {
    let mut rolling_hash = EMPTY_STRING_KECCAK;
    let mut collected = U256::zero();
    while collected < count {
        let operation = queue.pop_front()?;
        let mut preimage = [0_u8; 64];
        preimage[..32].copy_from_slice(rolling_hash.as_bytes());
        preimage[32..].copy_from_slice(operation.canonical_tx_hash.as_bytes());
        rolling_hash = H256(keccak256(&preimage));
        collected += U256::one();
    }
    Ok(rolling_hash)
}
