//! Classification of system logs emitted at the end of a batch.

use zksync_settlement_types::{
    h256_to_u256, system_logs::SystemLogKey, L2ToL1Log, PubdataSource, H256, U256,
};

use crate::errors::LogProcessingError;

/// Bitmap of processed logs if the batch does not contain a system contracts upgrade:
/// all keys except for [`SystemLogKey::ExpectedSystemContractUpgradeTxHash`].
pub const EXPECTED_BITMAP_WITHOUT_UPGRADE: u16 = 0b01_1111_1111;
/// Bitmap of processed logs for a batch with a system contracts upgrade.
pub const EXPECTED_BITMAP_WITH_UPGRADE: u16 = 0b11_1111_1111;

/// Values extracted from the system logs of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogProcessingOutput {
    pub l2_logs_tree_root: H256,
    /// Hash of inline pubdata; zero if pubdata is published in blobs.
    pub pubdata_hash: H256,
    pub state_diff_hash: H256,
    /// Batch timestamp in the upper 128 bits, timestamp of the last L2 block in the lower 128 bits.
    pub packed_batch_and_l2_block_timestamp: U256,
    pub previous_batch_hash: H256,
    pub chained_priority_txs_hash: H256,
    pub number_of_layer1_txs: U256,
    /// Linear hashes of blobs; zero if pubdata is published inline.
    pub blob_hashes: [H256; 2],
}

impl LogProcessingOutput {
    pub fn batch_timestamp(&self) -> U256 {
        self.packed_batch_and_l2_block_timestamp >> 128
    }

    pub fn last_l2_block_timestamp(&self) -> U256 {
        let mask = (U256::one() << 128) - U256::one();
        self.packed_batch_and_l2_block_timestamp & mask
    }
}

fn parse_key(key: H256) -> Result<SystemLogKey, LogProcessingError> {
    let numeric_key = h256_to_u256(key);
    if numeric_key > U256::from(u8::MAX) {
        return Err(LogProcessingError::UnknownLogKey { key });
    }
    SystemLogKey::try_from(numeric_key.low_u32() as u8)
        .map_err(|_| LogProcessingError::UnknownLogKey { key })
}

/// Walks the packed `system_logs` of a batch, checking that each expected log is emitted exactly once
/// by its authorized system contract, and collects the logged values.
///
/// `expected_upgrade_tx_hash` is zero if no system contracts upgrade is expected in the batch.
pub fn process_system_logs(
    system_logs: &[u8],
    pubdata_source: PubdataSource,
    expected_upgrade_tx_hash: H256,
) -> Result<LogProcessingOutput, LogProcessingError> {
    if system_logs.len() % L2ToL1Log::SERIALIZED_SIZE != 0 {
        return Err(LogProcessingError::MalformedSystemLogs {
            len: system_logs.len(),
        });
    }

    let mut output = LogProcessingOutput::default();
    let mut processed_logs = 0_u16;
    for packed_log in system_logs.chunks_exact(L2ToL1Log::SERIALIZED_SIZE) {
        let log = L2ToL1Log::from_slice(packed_log);
        let key = parse_key(log.key)?;
        if processed_logs & key.bit() != 0 {
            return Err(LogProcessingError::DuplicateLogKey { key });
        }
        processed_logs |= key.bit();

        let expected_sender = key.authorized_sender();
        if log.sender != expected_sender {
            return Err(LogProcessingError::WrongLogSender {
                key,
                sender: log.sender,
                expected: expected_sender,
            });
        }

        let value = log.value;
        match key {
            SystemLogKey::L2ToL1LogsTreeRoot => output.l2_logs_tree_root = value,
            SystemLogKey::TotalL2ToL1Pubdata => {
                if pubdata_source == PubdataSource::Calldata {
                    output.pubdata_hash = value;
                }
            }
            SystemLogKey::StateDiffHash => output.state_diff_hash = value,
            SystemLogKey::PackedBatchAndL2BlockTimestamp => {
                output.packed_batch_and_l2_block_timestamp = h256_to_u256(value);
            }
            SystemLogKey::PrevBatchHash => output.previous_batch_hash = value,
            SystemLogKey::ChainedPriorityTxnHash => output.chained_priority_txs_hash = value,
            SystemLogKey::NumberOfLayer1Txs => output.number_of_layer1_txs = h256_to_u256(value),
            SystemLogKey::BlobOneHash | SystemLogKey::BlobTwoHash => {
                if pubdata_source == PubdataSource::Blob {
                    let index = usize::from(key == SystemLogKey::BlobTwoHash);
                    output.blob_hashes[index] = value;
                }
            }
            SystemLogKey::ExpectedSystemContractUpgradeTxHash => {
                if value != expected_upgrade_tx_hash {
                    return Err(LogProcessingError::UpgradeTxHashMismatch {
                        expected: expected_upgrade_tx_hash,
                        actual: value,
                    });
                }
            }
        }
    }

    let expected = if expected_upgrade_tx_hash.is_zero() {
        EXPECTED_BITMAP_WITHOUT_UPGRADE
    } else {
        EXPECTED_BITMAP_WITH_UPGRADE
    };
    if processed_logs != expected {
        return Err(LogProcessingError::IncompleteLogSet {
            bitmap: processed_logs,
            expected,
        });
    }
    Ok(output)
}
