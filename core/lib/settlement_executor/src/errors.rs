use vise::{EncodeLabelSet, EncodeLabelValue};
use zksync_settlement_merkle::MerkleError;
use zksync_settlement_types::{system_logs::SystemLogKey, Address, H256, U256};

use crate::traits::PointEvaluationError;

/// Errors produced while processing system logs of a committed batch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LogProcessingError {
    #[error("system logs buffer has length {len}, which is not a multiple of the log size")]
    MalformedSystemLogs { len: usize },
    #[error("unknown system log key {key:?}")]
    UnknownLogKey { key: H256 },
    #[error("system log with key {key} is emitted more than once")]
    DuplicateLogKey { key: SystemLogKey },
    #[error("system log with key {key} is emitted by {sender:?}, expected {expected:?}")]
    WrongLogSender {
        key: SystemLogKey,
        sender: Address,
        expected: Address,
    },
    #[error("upgrade transaction hash in logs {actual:?} differs from the expected {expected:?}")]
    UpgradeTxHashMismatch { expected: H256, actual: H256 },
    #[error("processed system logs bitmap {bitmap:#b} differs from the expected {expected:#b}")]
    IncompleteLogSet { bitmap: u16, expected: u16 },
}

/// Errors produced by data availability verification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DaError {
    #[error("pubdata commitments are empty")]
    EmptyPubdataCommitments,
    #[error("unsupported pubdata source tag {0}")]
    UnsupportedPubdataSource(u8),
    #[error("inline pubdata has length {len}, which exceeds the limit {max}")]
    PubdataTooLarge { len: usize, max: usize },
    #[error("hash of inline pubdata {actual:?} differs from the one in system logs {expected:?}")]
    PubdataHashMismatch { expected: H256, actual: H256 },
    #[error("blob commitments have length {len}, which is not a positive multiple of the slot size")]
    MalformedPubdataCommitments { len: usize },
    #[error("batch references {count} blobs, while at most {max} are supported")]
    TooManyBlobs { count: usize, max: usize },
    #[error("no versioned hash for blob #{index}")]
    MissingBlobHash { index: usize },
    #[error("opening proof for blob #{index} is invalid")]
    InvalidBlobProof {
        index: usize,
        #[source]
        source: Option<PointEvaluationError>,
    },
    #[error("versioned hash for blob #{index} is present, but the blob is not referenced by the batch")]
    ExtraBlobDetected { index: usize },
    #[error("blob #{index} is referenced either only by system logs or only by pubdata commitments")]
    BlobHashCommitmentMismatch { index: usize },
}

/// Errors produced by the batch commitment builder.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommitmentError {
    #[error("system logs have length {len}, which exceeds the limit {max}")]
    SystemLogsTooLarge { len: usize, max: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriorityQueueError {
    #[error("priority queue is empty")]
    Empty,
}

/// Coarse classification of executor errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EncodeLabelValue, EncodeLabelSet)]
#[metrics(label = "kind", rename_all = "snake_case")]
pub enum ErrorKind {
    /// Batches are submitted out of order or outside the allowed counter bounds.
    Sequencing,
    /// Submitted data is inconsistent with itself or with the stored state.
    DataIntegrity,
    /// An external collaborator (proof verifier, point evaluation, priority queue) has failed.
    ExternalDependency,
}

/// Error returned by [`BatchExecutor`](crate::BatchExecutor) entry points. No state is modified
/// if an entry point returns an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutorError {
    #[error("supplied last committed batch {actual:?} differs from the stored one {expected:?}")]
    PreviousBatchMismatch { expected: H256, actual: H256 },
    #[error("no batches supplied")]
    EmptyBatchSet,
    #[error("batch #{actual} is supplied, while batch #{expected} is expected")]
    NonSequentialBatch { expected: u64, actual: u64 },
    #[error("batch timestamp in logs {from_logs} differs from the declared {declared}")]
    TimestampMismatch { declared: u64, from_logs: U256 },
    #[error("batch timestamp {timestamp} is not greater than the previous batch timestamp {previous}")]
    NonIncreasingTimestamp { previous: U256, timestamp: U256 },
    #[error("batch timestamp {timestamp} is greater than the last L2 block timestamp {last_l2_block_timestamp}")]
    TimestampAfterLastL2Block {
        timestamp: U256,
        last_l2_block_timestamp: U256,
    },
    #[error("batch timestamp {timestamp} is older than {min}")]
    TimestampTooOld { timestamp: U256, min: u64 },
    #[error("last L2 block timestamp {timestamp} is newer than {max}")]
    TimestampTooNew { timestamp: U256, max: u64 },
    #[error("previous batch hash in logs {actual:?} differs from the previous state root {expected:?}")]
    ChainMismatch { expected: H256, actual: H256 },
    #[error("priority operations hash {actual:?} differs from the expected {expected:?}")]
    PriorityHashMismatch { expected: H256, actual: H256 },
    #[error("number of L1 transactions {actual} differs from the one in system logs {expected}")]
    TxCountMismatch { expected: U256, actual: U256 },
    #[error("system contracts upgrade is already pending")]
    UpgradeAlreadyPending,
    #[error("system contracts upgrade transaction hash must be non-zero")]
    ZeroUpgradeTxHash,

    #[error("supplied previous proven batch differs from the stored batch #{batch_number}")]
    ProvenChainMismatch { batch_number: u64 },
    #[error("supplied batch #{batch_number} differs from the stored committed batch")]
    UnknownCommittedBatch { batch_number: u64 },
    #[error("proving {count} batches at once is not supported")]
    MultiProofUnsupported { count: usize },
    #[error("batch #{batch_number} is beyond the last committed batch #{total_committed}")]
    CommittedBoundsExceeded {
        batch_number: u64,
        total_committed: u64,
    },
    #[error("proof is rejected by the verifier")]
    ProofRejected,

    #[error("batch #{actual} is supplied for execution, while batch #{expected} is expected")]
    OutOfOrderExecution { expected: u64, actual: u64 },
    #[error("batch #{batch_number} is not committed")]
    NotCommitted { batch_number: u64 },
    #[error("executing up to batch #{executed} would overtake the last verified batch #{verified}")]
    ExecutedExceedsVerified { executed: u64, verified: u64 },

    #[error("cannot revert to batch #{new_last_batch}, batch #{total_executed} is already executed")]
    CannotRevertExecuted {
        new_last_batch: u64,
        total_executed: u64,
    },
    #[error("nothing to revert: batch #{new_last_batch} is not below the last committed #{total_committed}")]
    NothingToRevert {
        new_last_batch: u64,
        total_committed: u64,
    },

    #[error("batch #{batch_number} is not executed yet")]
    BatchNotExecuted { batch_number: u64 },
    #[error("proving inclusion of the default logs tree leaf is forbidden")]
    DefaultLogLeaf,

    #[error(transparent)]
    LogProcessing(#[from] LogProcessingError),
    #[error(transparent)]
    Da(#[from] DaError),
    #[error(transparent)]
    Commitment(#[from] CommitmentError),
    #[error(transparent)]
    Merkle(#[from] MerkleError),
    #[error(transparent)]
    PriorityQueue(#[from] PriorityQueueError),
}

impl ExecutorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PreviousBatchMismatch { .. }
            | Self::EmptyBatchSet
            | Self::NonSequentialBatch { .. }
            | Self::UpgradeAlreadyPending
            | Self::MultiProofUnsupported { .. }
            | Self::CommittedBoundsExceeded { .. }
            | Self::OutOfOrderExecution { .. }
            | Self::NotCommitted { .. }
            | Self::ExecutedExceedsVerified { .. }
            | Self::CannotRevertExecuted { .. }
            | Self::NothingToRevert { .. }
            | Self::BatchNotExecuted { .. }
            | Self::ProvenChainMismatch { .. }
            | Self::UnknownCommittedBatch { .. } => ErrorKind::Sequencing,

            Self::ProofRejected
            | Self::PriorityQueue(_)
            | Self::Da(DaError::InvalidBlobProof { .. }) => ErrorKind::ExternalDependency,

            Self::TimestampMismatch { .. }
            | Self::NonIncreasingTimestamp { .. }
            | Self::TimestampAfterLastL2Block { .. }
            | Self::TimestampTooOld { .. }
            | Self::TimestampTooNew { .. }
            | Self::ChainMismatch { .. }
            | Self::PriorityHashMismatch { .. }
            | Self::TxCountMismatch { .. }
            | Self::ZeroUpgradeTxHash
            | Self::DefaultLogLeaf
            | Self::LogProcessing(_)
            | Self::Da(_)
            | Self::Commitment(_)
            | Self::Merkle(_) => ErrorKind::DataIntegrity,
        }
    }
}
