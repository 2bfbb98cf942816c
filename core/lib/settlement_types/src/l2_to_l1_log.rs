use serde::{Deserialize, Serialize};

use crate::{
    address_to_h256, keccak256, system_logs::L2_TO_L1_MESSENGER_ADDRESS, Address, H256,
};

/// Log sent from L2 to L1. Both system logs (in `CommitBatchInfo::system_logs`) and user logs
/// (leaves of the L2 logs Merkle tree) share this layout.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct L2ToL1Log {
    pub shard_id: u8,
    pub is_service: bool,
    pub tx_number_in_block: u16,
    pub sender: Address,
    pub key: H256,
    pub value: H256,
}

impl L2ToL1Log {
    /// Size of a packed log record in bytes.
    pub const SERIALIZED_SIZE: usize = 88;
    pub const SENDER_OFFSET: usize = 4;
    pub const KEY_OFFSET: usize = 24;
    pub const VALUE_OFFSET: usize = 56;

    /// Legacy upper bound of L2-to-L1 logs per single L1 batch. It still determines the minimum
    /// number of leaves in the Merkle tree built from the logs of a batch.
    pub const LEGACY_LIMIT_PER_L1_BATCH: usize = 512;

    /// Parses a packed record.
    ///
    /// # Panics
    ///
    /// Panics if `data` is not exactly [`Self::SERIALIZED_SIZE`] bytes long.
    pub fn from_slice(data: &[u8]) -> Self {
        assert_eq!(data.len(), Self::SERIALIZED_SIZE);
        Self {
            shard_id: data[0],
            is_service: data[1] != 0,
            tx_number_in_block: u16::from_be_bytes([data[2], data[3]]),
            sender: Address::from_slice(&data[Self::SENDER_OFFSET..Self::KEY_OFFSET]),
            key: H256::from_slice(&data[Self::KEY_OFFSET..Self::VALUE_OFFSET]),
            value: H256::from_slice(&data[Self::VALUE_OFFSET..]),
        }
    }

    /// Packs this log: `shard_id | is_service | tx_number_in_block | sender | key | value`.
    pub fn to_bytes(&self) -> [u8; Self::SERIALIZED_SIZE] {
        let mut buffer = [0_u8; Self::SERIALIZED_SIZE];
        buffer[0] = self.shard_id;
        buffer[1] = self.is_service as u8;
        buffer[2..4].copy_from_slice(&self.tx_number_in_block.to_be_bytes());
        buffer[Self::SENDER_OFFSET..Self::KEY_OFFSET].copy_from_slice(self.sender.as_bytes());
        buffer[Self::KEY_OFFSET..Self::VALUE_OFFSET].copy_from_slice(self.key.as_bytes());
        buffer[Self::VALUE_OFFSET..].copy_from_slice(self.value.as_bytes());
        buffer
    }

    /// Hash of the packed log, i.e. the leaf of the L2 logs Merkle tree.
    pub fn hash(&self) -> H256 {
        H256(keccak256(&self.to_bytes()))
    }
}

/// Hash of an all-zero log record; the value of padding leaves in the L2 logs tree.
pub fn l2_to_l1_logs_tree_default_leaf_hash() -> H256 {
    H256(keccak256(&[0_u8; L2ToL1Log::SERIALIZED_SIZE]))
}

/// Arbitrary-length message sent from L2 to L1 through the messenger system contract.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct L2Message {
    pub tx_number_in_block: u16,
    pub sender: Address,
    pub data: Vec<u8>,
}

impl L2Message {
    /// The service log that the messenger emits for this message.
    pub fn to_log(&self) -> L2ToL1Log {
        L2ToL1Log {
            shard_id: 0,
            is_service: true,
            tx_number_in_block: self.tx_number_in_block,
            sender: L2_TO_L1_MESSENGER_ADDRESS,
            key: address_to_h256(&self.sender),
            value: H256(keccak256(&self.data)),
        }
    }
}
