//! Metrics for the batch executor.

use std::time::Duration;

use vise::{
    Buckets, Counter, EncodeLabelSet, EncodeLabelValue, Family, Gauge, Histogram, Metrics, Unit,
};

use crate::{errors::ErrorKind, state::ExecutorState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EncodeLabelValue, EncodeLabelSet)]
#[metrics(label = "operation", rename_all = "snake_case")]
pub(crate) enum Operation {
    Commit,
    Prove,
    Execute,
    Revert,
    ScheduleUpgrade,
    ProveLogInclusion,
}

const BATCH_COUNT_BUCKETS: Buckets = Buckets::linear(1.0..=16.0, 1.0);

#[derive(Debug, Metrics)]
#[metrics(prefix = "settlement_executor")]
pub(crate) struct ExecutorMetrics {
    /// Number of committed batches.
    pub total_batches_committed: Gauge<u64>,
    /// Number of batches with a verified proof.
    pub total_batches_verified: Gauge<u64>,
    /// Number of executed batches.
    pub total_batches_executed: Gauge<u64>,
    /// Latency of executor entry points.
    #[metrics(buckets = Buckets::LATENCIES, unit = Unit::Seconds)]
    pub operation_latency: Family<Operation, Histogram<Duration>>,
    /// Number of batches processed by a single successful call.
    #[metrics(buckets = BATCH_COUNT_BUCKETS)]
    pub batches_per_call: Family<Operation, Histogram<u64>>,
    /// Number of rejected calls by the error kind.
    pub rejected_calls: Family<ErrorKind, Counter>,
}

impl ExecutorMetrics {
    pub fn observe_state(&self, state: &ExecutorState) {
        self.total_batches_committed
            .set(state.total_batches_committed());
        self.total_batches_verified.set(state.total_batches_verified());
        self.total_batches_executed.set(state.total_batches_executed());
    }
}

#[vise::register]
pub(crate) static METRICS: vise::Global<ExecutorMetrics> = vise::Global::new();
