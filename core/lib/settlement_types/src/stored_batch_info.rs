use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::{
    abi::{into_tuple, ContractError, Tokenizable},
    ethabi::{self, ParamType, Token},
    keccak256, parse_h256, H256, U256,
};

// struct StoredBatchInfo {
//     uint64 batchNumber;
//     bytes32 batchHash;
//     uint64 indexRepeatedStorageChanges;
//     uint256 numberOfLayer1Txs;
//     bytes32 priorityOperationsHash;
//     bytes32 l2LogsTreeRoot;
//     uint256 timestamp;
//     bytes32 commitment;
// }
/// Canonical record of a committed batch. The settlement layer only stores its hash,
/// so the whole record must be supplied again by the operator on prove / execute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredBatchInfo {
    pub batch_number: u64,
    /// Root of the state tree after the batch.
    pub batch_hash: H256,
    pub index_repeated_storage_changes: u64,
    pub number_of_layer1_txs: U256,
    pub priority_operations_hash: H256,
    pub l2_logs_tree_root: H256,
    pub timestamp: U256,
    pub commitment: H256,
}

impl StoredBatchInfo {
    /// Batch stored at index 0 before any batch is committed.
    pub fn genesis() -> Self {
        Self::default()
    }

    pub fn schema() -> ParamType {
        ParamType::Tuple(vec![
            ParamType::Uint(64),       // `batch_number`
            ParamType::FixedBytes(32), // `batch_hash`
            ParamType::Uint(64),       // `index_repeated_storage_changes`
            ParamType::Uint(256),      // `number_of_layer1_txs`
            ParamType::FixedBytes(32), // `priority_operations_hash`
            ParamType::FixedBytes(32), // `l2_logs_tree_root`
            ParamType::Uint(256),      // `timestamp`
            ParamType::FixedBytes(32), // `commitment`
        ])
    }

    /// ABI-encodes the struct.
    pub fn encode(&self) -> Vec<u8> {
        ethabi::encode(&[self.clone().into_token()])
    }

    /// Decodes the struct from its ABI encoding.
    pub fn decode(bytes: &[u8]) -> anyhow::Result<Self> {
        let [token] = <[Token; 1]>::try_from(ethabi::decode(&[Self::schema()], bytes)?)
            .map_err(|tokens| anyhow::anyhow!("unexpected number of tokens: {}", tokens.len()))?;
        Ok(Self::from_token(token)?)
    }

    /// Hash under which the batch is stored; `_hashStoredBatchInfo` from `Executor.sol`.
    pub fn hash(&self) -> H256 {
        H256(keccak256(&self.encode()))
    }
}

impl Tokenizable for StoredBatchInfo {
    fn from_token(token: Token) -> Result<Self, ContractError> {
        (|| {
            let [
                Token::Uint(batch_number),
                Token::FixedBytes(batch_hash),
                Token::Uint(index_repeated_storage_changes),
                Token::Uint(number_of_layer1_txs),
                Token::FixedBytes(priority_operations_hash),
                Token::FixedBytes(l2_logs_tree_root),
                Token::Uint(timestamp),
                Token::FixedBytes(commitment),
            ] = into_tuple::<8>(token)?
            else {
                anyhow::bail!("bad format");
            };
            Ok(Self {
                batch_number: batch_number
                    .try_into()
                    .ok()
                    .context("overflow")
                    .context("batch_number")?,
                batch_hash: parse_h256(&batch_hash).context("batch_hash")?,
                index_repeated_storage_changes: index_repeated_storage_changes
                    .try_into()
                    .ok()
                    .context("overflow")
                    .context("index_repeated_storage_changes")?,
                number_of_layer1_txs,
                priority_operations_hash: parse_h256(&priority_operations_hash)
                    .context("priority_operations_hash")?,
                l2_logs_tree_root: parse_h256(&l2_logs_tree_root).context("l2_logs_tree_root")?,
                timestamp,
                commitment: parse_h256(&commitment).context("commitment")?,
            })
        })()
        .map_err(|err| ContractError::InvalidOutputType(format!("{err:#}")))
    }

    fn into_token(self) -> Token {
        Token::Tuple(vec![
            Token::Uint(self.batch_number.into()),
            Token::FixedBytes(self.batch_hash.as_bytes().to_vec()),
            Token::Uint(self.index_repeated_storage_changes.into()),
            Token::Uint(self.number_of_layer1_txs),
            Token::FixedBytes(self.priority_operations_hash.as_bytes().to_vec()),
            Token::FixedBytes(self.l2_logs_tree_root.as_bytes().to_vec()),
            Token::Uint(self.timestamp),
            Token::FixedBytes(self.commitment.as_bytes().to_vec()),
        ])
    }
}
