//! Batch lifecycle state machine: commit, prove, execute and revert.

use std::sync::Arc;

use zksync_settlement_config::ExecutorConfig;
use zksync_settlement_types::H256;

use crate::{
    commitment::BatchCommitmentBuilder,
    da::DaVerifier,
    errors::ExecutorError,
    metrics::{Operation, METRICS},
    state::{ExecutorState, UpgradeState},
    traits::{PointEvaluation, ProofVerifier, PubdataRelay},
};

mod commit;
mod inclusion;
mod lifecycle;

/// Validates batches submitted by the operator and advances [`ExecutorState`].
///
/// Each entry point either applies all of its changes to the state or returns an error
/// leaving the state (and the priority queue, for execution) untouched.
#[derive(Debug)]
pub struct BatchExecutor {
    config: ExecutorConfig,
    commitment_builder: BatchCommitmentBuilder,
    da_verifier: DaVerifier,
    proof_verifier: Arc<dyn ProofVerifier>,
    pubdata_relay: Option<Arc<dyn PubdataRelay>>,
}

impl BatchExecutor {
    pub fn new(
        config: ExecutorConfig,
        proof_verifier: Arc<dyn ProofVerifier>,
        point_evaluation: Arc<dyn PointEvaluation>,
    ) -> Self {
        Self {
            commitment_builder: BatchCommitmentBuilder::from_config(&config),
            da_verifier: DaVerifier::new(point_evaluation, config.max_inline_pubdata_bytes),
            config,
            proof_verifier,
            pubdata_relay: None,
        }
    }

    /// Sets the relay for inline pubdata. Pubdata is only relayed if
    /// [`ExecutorConfig::relay_inline_pubdata`] is set.
    #[must_use]
    pub fn with_pubdata_relay(mut self, relay: Arc<dyn PubdataRelay>) -> Self {
        self.pubdata_relay = Some(relay);
        self
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Schedules a system contracts upgrade. The upgrade transaction must be included
    /// into the first batch committed afterwards.
    pub fn schedule_system_contracts_upgrade(
        &self,
        state: &mut ExecutorState,
        tx_hash: H256,
    ) -> Result<(), ExecutorError> {
        let result = Self::try_schedule_upgrade(state, tx_hash);
        Self::report(Operation::ScheduleUpgrade, state, result)
    }

    fn try_schedule_upgrade(state: &mut ExecutorState, tx_hash: H256) -> Result<(), ExecutorError> {
        if tx_hash.is_zero() {
            return Err(ExecutorError::ZeroUpgradeTxHash);
        }
        if !state.upgrade.tx_hash.is_zero() {
            return Err(ExecutorError::UpgradeAlreadyPending);
        }
        state.upgrade = UpgradeState {
            tx_hash,
            batch_number: None,
        };
        tracing::info!("Scheduled system contracts upgrade with transaction {tx_hash:?}");
        Ok(())
    }

    fn report<T>(
        operation: Operation,
        state: &ExecutorState,
        result: Result<T, ExecutorError>,
    ) -> Result<T, ExecutorError> {
        match &result {
            Ok(_) => METRICS.observe_state(state),
            Err(err) => {
                let kind = err.kind();
                METRICS.rejected_calls[&kind].inc();
                tracing::warn!(?operation, ?kind, "Executor call rejected: {err}");
            }
        }
        result
    }
}
