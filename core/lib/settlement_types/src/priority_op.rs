use serde::{Deserialize, Serialize};

use crate::{PriorityOpId, H256};

/// L1-originated operation waiting in the priority queue to be included into an L2 batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityOperation {
    pub id: PriorityOpId,
    pub canonical_tx_hash: H256,
    pub expiration_timestamp: u64,
    pub layer2_tip: u128,
}
