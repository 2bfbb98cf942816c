use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::{
    abi::{into_tuple, ContractError, Tokenizable},
    ethabi::{ParamType, Token},
    parse_h256, H256, U256,
};

/// Untrusted description of a batch submitted by the operator in `commitBatches`.
///
/// Only the derived [`StoredBatchInfo`](crate::StoredBatchInfo) survives the commit; everything
/// else is used to check the batch against its system logs and to build the batch commitment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitBatchInfo {
    pub batch_number: u64,
    pub timestamp: u64,
    pub index_repeated_storage_changes: u64,
    pub new_state_root: H256,
    pub number_of_layer1_txs: U256,
    pub priority_operations_hash: H256,
    pub bootloader_heap_initial_contents_hash: H256,
    pub events_queue_state_hash: H256,
    /// Concatenated packed system logs, see [`L2ToL1Log`](crate::L2ToL1Log).
    pub system_logs: Vec<u8>,
    /// Pubdata source tag followed by either the pubdata itself or packed blob commitments.
    pub pubdata_commitments: Vec<u8>,
}

impl CommitBatchInfo {
    pub fn schema() -> ParamType {
        ParamType::Tuple(vec![
            ParamType::Uint(64),       // `batch_number`
            ParamType::Uint(64),       // `timestamp`
            ParamType::Uint(64),       // `index_repeated_storage_changes`
            ParamType::FixedBytes(32), // `new_state_root`
            ParamType::Uint(256),      // `number_of_layer1_txs`
            ParamType::FixedBytes(32), // `priority_operations_hash`
            ParamType::FixedBytes(32), // `bootloader_heap_initial_contents_hash`
            ParamType::FixedBytes(32), // `events_queue_state_hash`
            ParamType::Bytes,          // `system_logs`
            ParamType::Bytes,          // `pubdata_commitments`
        ])
    }
}

impl Tokenizable for CommitBatchInfo {
    fn from_token(token: Token) -> Result<Self, ContractError> {
        (|| {
            let [
                Token::Uint(batch_number),
                Token::Uint(timestamp),
                Token::Uint(index_repeated_storage_changes),
                Token::FixedBytes(new_state_root),
                Token::Uint(number_of_layer1_txs),
                Token::FixedBytes(priority_operations_hash),
                Token::FixedBytes(bootloader_heap_initial_contents_hash),
                Token::FixedBytes(events_queue_state_hash),
                Token::Bytes(system_logs),
                Token::Bytes(pubdata_commitments),
            ] = into_tuple::<10>(token)?
            else {
                anyhow::bail!("bad format");
            };
            Ok(Self {
                batch_number: batch_number.try_into().ok().context("batch_number")?,
                timestamp: timestamp.try_into().ok().context("timestamp")?,
                index_repeated_storage_changes: index_repeated_storage_changes
                    .try_into()
                    .ok()
                    .context("index_repeated_storage_changes")?,
                new_state_root: parse_h256(&new_state_root).context("new_state_root")?,
                number_of_layer1_txs,
                priority_operations_hash: parse_h256(&priority_operations_hash)
                    .context("priority_operations_hash")?,
                bootloader_heap_initial_contents_hash: parse_h256(
                    &bootloader_heap_initial_contents_hash,
                )
                .context("bootloader_heap_initial_contents_hash")?,
                events_queue_state_hash: parse_h256(&events_queue_state_hash)
                    .context("events_queue_state_hash")?,
                system_logs,
                pubdata_commitments,
            })
        })()
        .map_err(|err| ContractError::InvalidOutputType(format!("{err:#}")))
    }

    fn into_token(self) -> Token {
        Token::Tuple(vec![
            Token::Uint(self.batch_number.into()),
            Token::Uint(self.timestamp.into()),
            Token::Uint(self.index_repeated_storage_changes.into()),
            Token::FixedBytes(self.new_state_root.as_bytes().to_vec()),
            Token::Uint(self.number_of_layer1_txs),
            Token::FixedBytes(self.priority_operations_hash.as_bytes().to_vec()),
            Token::FixedBytes(self.bootloader_heap_initial_contents_hash.as_bytes().to_vec()),
            Token::FixedBytes(self.events_queue_state_hash.as_bytes().to_vec()),
            Token::Bytes(self.system_logs),
            Token::Bytes(self.pubdata_commitments),
        ])
    }
}
