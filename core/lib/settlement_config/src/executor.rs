use std::time::Duration;

use serde::Deserialize;
use zksync_settlement_types::{VerifierParams, H256};

use crate::{envy_load, FromEnv};

/// Configuration of the batch executor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExecutorConfig {
    /// L2 chain ID; used when relaying pubdata to the settlement layer.
    pub chain_id: u64,
    /// Whether zkPorter is available. Only affects the batch metadata hash.
    #[serde(default)]
    pub zkporter_is_available: bool,
    /// Hash of the bootloader bytecode the batches are executed with.
    pub bootloader_code_hash: H256,
    /// Hash of the default account abstraction bytecode.
    pub default_aa_code_hash: H256,
    /// Hash of the recursion node-level verification key; part of the proof public input.
    pub recursion_node_level_vk_hash: H256,
    /// Hash of the recursion leaf-level verification key; part of the proof public input.
    pub recursion_leaf_level_vk_hash: H256,
    /// Maximum age of a committed batch relative to the current block timestamp, in seconds.
    #[serde(default = "ExecutorConfig::default_commit_timestamp_not_older_secs")]
    pub commit_timestamp_not_older_secs: u64,
    /// Allowed drift of the last L2 block timestamp into the future, in seconds.
    #[serde(default = "ExecutorConfig::default_commit_timestamp_approximation_delta_secs")]
    pub commit_timestamp_approximation_delta_secs: u64,
    /// Maximum length of the system logs buffer of a single batch, in bytes.
    #[serde(default = "ExecutorConfig::default_max_system_logs_bytes")]
    pub max_system_logs_bytes: usize,
    /// Maximum length of inline (calldata) pubdata of a single batch, in bytes.
    #[serde(default = "ExecutorConfig::default_max_inline_pubdata_bytes")]
    pub max_inline_pubdata_bytes: usize,
    /// If set, verified inline pubdata is re-published to the settlement layer.
    #[serde(default)]
    pub relay_inline_pubdata: bool,
}

impl ExecutorConfig {
    const fn default_commit_timestamp_not_older_secs() -> u64 {
        3 * 24 * 60 * 60
    }

    const fn default_commit_timestamp_approximation_delta_secs() -> u64 {
        60 * 60
    }

    /// 4 bytes for the log count and 512 logs of 88 bytes each.
    const fn default_max_system_logs_bytes() -> usize {
        4 + 88 * 512
    }

    const fn default_max_inline_pubdata_bytes() -> usize {
        126_976
    }

    /// Creates a config for tests, with all limits set to their defaults.
    pub fn for_tests() -> Self {
        Self {
            chain_id: 270,
            zkporter_is_available: false,
            bootloader_code_hash: H256::repeat_byte(0x01),
            default_aa_code_hash: H256::repeat_byte(0x02),
            recursion_node_level_vk_hash: H256::repeat_byte(0x03),
            recursion_leaf_level_vk_hash: H256::repeat_byte(0x04),
            commit_timestamp_not_older_secs: Self::default_commit_timestamp_not_older_secs(),
            commit_timestamp_approximation_delta_secs:
                Self::default_commit_timestamp_approximation_delta_secs(),
            max_system_logs_bytes: Self::default_max_system_logs_bytes(),
            max_inline_pubdata_bytes: Self::default_max_inline_pubdata_bytes(),
            relay_inline_pubdata: false,
        }
    }

    pub fn commit_timestamp_not_older(&self) -> Duration {
        Duration::from_secs(self.commit_timestamp_not_older_secs)
    }

    pub fn commit_timestamp_approximation_delta(&self) -> Duration {
        Duration::from_secs(self.commit_timestamp_approximation_delta_secs)
    }

    /// Returns the verification key hashes the proof public input is bound to.
    pub fn verifier_params(&self) -> VerifierParams {
        VerifierParams {
            recursion_node_level_vk_hash: self.recursion_node_level_vk_hash,
            recursion_leaf_level_vk_hash: self.recursion_leaf_level_vk_hash,
            recursion_circuits_set_vks_hash: H256::zero(),
        }
    }
}

impl FromEnv for ExecutorConfig {
    fn from_env() -> anyhow::Result<Self> {
        envy_load("executor", "EXECUTOR_")
    }
}
