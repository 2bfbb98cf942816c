//! Batch commitment: a hash binding the batch state transition, the system configuration,
//! and the auxiliary batch output (logs, state diffs, and DA commitments).

use serde::{Deserialize, Serialize};
use zksync_settlement_config::ExecutorConfig;
use zksync_settlement_types::{keccak256, pubdata::MAX_NUMBER_OF_BLOBS, CommitBatchInfo, H256};

use crate::{errors::CommitmentError, logs::LogProcessingOutput};

/// Linear hash of a blob from the system logs, paired with its DA commitment.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobHash {
    pub linear_hash: H256,
    pub commitment: H256,
}

/// State transition data of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPassThroughData {
    pub index_repeated_storage_changes: u64,
    pub new_state_root: H256,
}

impl BatchPassThroughData {
    /// Rollup state followed by the zkPorter state, which is always zero.
    const SERIALIZED_SIZE: usize = 8 + 32 + 8 + 32;

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(Self::SERIALIZED_SIZE);
        result.extend_from_slice(&self.index_repeated_storage_changes.to_be_bytes());
        result.extend_from_slice(self.new_state_root.as_bytes());
        result.extend_from_slice(&0_u64.to_be_bytes());
        result.extend_from_slice(H256::zero().as_bytes());
        result
    }

    pub fn hash(&self) -> H256 {
        H256(keccak256(&self.to_bytes()))
    }
}

/// Meta parameters of batches. They are the same for each batch per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchMetaParameters {
    pub zkporter_is_available: bool,
    pub bootloader_code_hash: H256,
    pub default_aa_code_hash: H256,
}

impl BatchMetaParameters {
    pub fn from_config(config: &ExecutorConfig) -> Self {
        Self {
            zkporter_is_available: config.zkporter_is_available,
            bootloader_code_hash: config.bootloader_code_hash,
            default_aa_code_hash: config.default_aa_code_hash,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        const SERIALIZED_SIZE: usize = 1 + 32 + 32;
        let mut result = Vec::with_capacity(SERIALIZED_SIZE);
        result.push(u8::from(self.zkporter_is_available));
        result.extend_from_slice(self.bootloader_code_hash.as_bytes());
        result.extend_from_slice(self.default_aa_code_hash.as_bytes());
        result
    }

    pub fn hash(&self) -> H256 {
        H256(keccak256(&self.to_bytes()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchAuxiliaryOutput {
    pub system_logs_linear_hash: H256,
    pub state_diff_hash: H256,
    pub bootloader_heap_initial_content_hash: H256,
    pub events_queue_state_hash: H256,
    pub blob_hashes: [BlobHash; MAX_NUMBER_OF_BLOBS],
}

impl BatchAuxiliaryOutput {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(32 * (4 + 2 * MAX_NUMBER_OF_BLOBS));
        result.extend_from_slice(self.system_logs_linear_hash.as_bytes());
        result.extend_from_slice(self.state_diff_hash.as_bytes());
        result.extend_from_slice(self.bootloader_heap_initial_content_hash.as_bytes());
        result.extend_from_slice(self.events_queue_state_hash.as_bytes());
        for blob in &self.blob_hashes {
            result.extend_from_slice(blob.linear_hash.as_bytes());
            result.extend_from_slice(blob.commitment.as_bytes());
        }
        result
    }

    pub fn hash(&self) -> H256 {
        H256(keccak256(&self.to_bytes()))
    }
}

/// Hashes of commitment components together with the resulting commitment.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchCommitmentHash {
    pub pass_through_data: H256,
    pub aux_output: H256,
    pub meta_parameters: H256,
    pub commitment: H256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchCommitment {
    pub pass_through_data: BatchPassThroughData,
    pub meta_parameters: BatchMetaParameters,
    pub auxiliary_output: BatchAuxiliaryOutput,
}

impl BatchCommitment {
    pub fn hash(&self) -> BatchCommitmentHash {
        let pass_through_data = self.pass_through_data.hash();
        let meta_parameters = self.meta_parameters.hash();
        let aux_output = self.auxiliary_output.hash();

        let mut preimage = Vec::with_capacity(3 * 32);
        preimage.extend_from_slice(pass_through_data.as_bytes());
        preimage.extend_from_slice(meta_parameters.as_bytes());
        preimage.extend_from_slice(aux_output.as_bytes());
        BatchCommitmentHash {
            pass_through_data,
            aux_output,
            meta_parameters,
            commitment: H256(keccak256(&preimage)),
        }
    }
}

/// Builds commitments of committed batches.
#[derive(Debug, Clone)]
pub struct BatchCommitmentBuilder {
    meta_parameters: BatchMetaParameters,
    max_system_logs_bytes: usize,
}

impl BatchCommitmentBuilder {
    pub fn new(meta_parameters: BatchMetaParameters, max_system_logs_bytes: usize) -> Self {
        Self {
            meta_parameters,
            max_system_logs_bytes,
        }
    }

    pub fn from_config(config: &ExecutorConfig) -> Self {
        Self::new(
            BatchMetaParameters::from_config(config),
            config.max_system_logs_bytes,
        )
    }

    /// Builds the commitment of `batch`. `blob_commitments` are produced by the DA verifier.
    pub fn build(
        &self,
        batch: &CommitBatchInfo,
        log_output: &LogProcessingOutput,
        blob_commitments: [H256; MAX_NUMBER_OF_BLOBS],
    ) -> Result<BatchCommitment, CommitmentError> {
        if batch.system_logs.len() > self.max_system_logs_bytes {
            return Err(CommitmentError::SystemLogsTooLarge {
                len: batch.system_logs.len(),
                max: self.max_system_logs_bytes,
            });
        }

        let mut blob_hashes = [BlobHash::default(); MAX_NUMBER_OF_BLOBS];
        for (i, blob) in blob_hashes.iter_mut().enumerate() {
            blob.linear_hash = log_output.blob_hashes[i];
            blob.commitment = blob_commitments[i];
        }

        Ok(BatchCommitment {
            pass_through_data: BatchPassThroughData {
                index_repeated_storage_changes: batch.index_repeated_storage_changes,
                new_state_root: batch.new_state_root,
            },
            meta_parameters: self.meta_parameters.clone(),
            auxiliary_output: BatchAuxiliaryOutput {
                system_logs_linear_hash: H256(keccak256(&batch.system_logs)),
                state_diff_hash: log_output.state_diff_hash,
                bootloader_heap_initial_content_hash: batch.bootloader_heap_initial_contents_hash,
                events_queue_state_hash: batch.events_queue_state_hash,
                blob_hashes,
            },
        })
    }
}
