use zksync_settlement_merkle::calculate_root;
use zksync_settlement_types::{
    l2_to_l1_log::l2_to_l1_logs_tree_default_leaf_hash, L2Message, L2ToL1Log, H256, U256,
};

use super::BatchExecutor;
use crate::{errors::ExecutorError, metrics::Operation, state::ExecutorState};

impl BatchExecutor {
    /// Checks that `log` is included into the L2 logs tree of the executed batch `batch_number`
    /// at `index`. Returns `Ok(false)` if the proof resolves to a different root.
    pub fn prove_l2_log_inclusion(
        &self,
        state: &ExecutorState,
        batch_number: u64,
        index: U256,
        log: &L2ToL1Log,
        proof: &[H256],
    ) -> Result<bool, ExecutorError> {
        let result = Self::check_log_inclusion(state, batch_number, index, log, proof);
        Self::report(Operation::ProveLogInclusion, state, result)
    }

    /// Checks that `message` was sent from L2 in the executed batch `batch_number`.
    pub fn prove_l2_message_inclusion(
        &self,
        state: &ExecutorState,
        batch_number: u64,
        index: U256,
        message: &L2Message,
        proof: &[H256],
    ) -> Result<bool, ExecutorError> {
        self.prove_l2_log_inclusion(state, batch_number, index, &message.to_log(), proof)
    }

    fn check_log_inclusion(
        state: &ExecutorState,
        batch_number: u64,
        index: U256,
        log: &L2ToL1Log,
        proof: &[H256],
    ) -> Result<bool, ExecutorError> {
        if batch_number > state.total_batches_executed {
            return Err(ExecutorError::BatchNotExecuted { batch_number });
        }
        let leaf_hash = log.hash();
        if leaf_hash == l2_to_l1_logs_tree_default_leaf_hash() {
            return Err(ExecutorError::DefaultLogLeaf);
        }
        let root = calculate_root(proof, index, leaf_hash)?;
        Ok(state.l2_logs_tree_root(batch_number) == Some(root))
    }
}
