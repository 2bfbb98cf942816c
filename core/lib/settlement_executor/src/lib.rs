//! Validation core of the ZKsync settlement layer.
//!
//! [`BatchExecutor`] drives committed L2 batches through their lifecycle: batches are committed
//! (checked against their system logs and published data), proven (checked against a validity proof)
//! and executed (checked against the priority queue). Committed but not executed batches can be reverted.
//! All lifecycle state is contained in [`ExecutorState`], which is passed to each entry point explicitly.

pub use self::{
    commitment::{BatchCommitment, BatchCommitmentBuilder, BatchCommitmentHash},
    da::{DaVerifier, KzgPointEvaluation, PubdataCommitments},
    errors::{
        CommitmentError, DaError, ErrorKind, ExecutorError, LogProcessingError, PriorityQueueError,
    },
    executor::BatchExecutor,
    logs::{process_system_logs, LogProcessingOutput},
    priority_queue::{collect_priority_operations, InMemoryPriorityQueue, PriorityQueue},
    state::{ExecutorState, UpgradeState},
    traits::{
        BlobHashSource, PointEvaluation, PointEvaluationError, ProofVerifier, PubdataRelay,
        SettlementEnv,
    },
};

pub mod commitment;
pub mod da;
mod errors;
mod executor;
pub mod logs;
mod metrics;
pub mod priority_queue;
mod state;
#[cfg(test)]
mod testonly;
mod traits;
