use zksync_settlement_types::{h256_to_u256, keccak256, ProofInput, StoredBatchInfo, H256, U256};

use super::BatchExecutor;
use crate::{
    errors::ExecutorError,
    metrics::{Operation, METRICS},
    priority_queue::{collect_priority_operations, PriorityQueue},
    state::ExecutorState,
};

/// Number of most significant bits cut off the proof public input so that it fits into a field element.
const PUBLIC_INPUT_SHIFT: usize = 32;

impl BatchExecutor {
    /// Proves `committed_batches` following `previous_proven_batch`, which must be the last verified batch.
    /// Only a single batch can be proven per call.
    pub fn prove_batches(
        &self,
        state: &mut ExecutorState,
        previous_proven_batch: &StoredBatchInfo,
        committed_batches: &[StoredBatchInfo],
        proof: &ProofInput,
    ) -> Result<(), ExecutorError> {
        let latency = METRICS.operation_latency[&Operation::Prove].start();
        let result = self.try_prove_batches(state, previous_proven_batch, committed_batches, proof);
        latency.observe();
        Self::report(Operation::Prove, state, result)
    }

    fn try_prove_batches(
        &self,
        state: &mut ExecutorState,
        previous_proven_batch: &StoredBatchInfo,
        committed_batches: &[StoredBatchInfo],
        proof: &ProofInput,
    ) -> Result<(), ExecutorError> {
        let total_verified = state.total_batches_verified;
        if !state.is_stored(total_verified, previous_proven_batch) {
            return Err(ExecutorError::ProvenChainMismatch {
                batch_number: total_verified,
            });
        }
        if committed_batches.is_empty() {
            return Err(ExecutorError::EmptyBatchSet);
        }

        let mut public_inputs = Vec::with_capacity(committed_batches.len());
        let mut previous_commitment = previous_proven_batch.commitment;
        for (i, batch) in committed_batches.iter().enumerate() {
            let batch_number = total_verified + i as u64 + 1;
            if !state.is_stored(batch_number, batch) {
                return Err(ExecutorError::UnknownCommittedBatch { batch_number });
            }
            public_inputs.push(self.public_input(previous_commitment, batch.commitment));
            previous_commitment = batch.commitment;
        }
        if public_inputs.len() > 1 {
            return Err(ExecutorError::MultiProofUnsupported {
                count: public_inputs.len(),
            });
        }

        let new_total_verified = total_verified + committed_batches.len() as u64;
        if new_total_verified > state.total_batches_committed {
            return Err(ExecutorError::CommittedBoundsExceeded {
                batch_number: new_total_verified,
                total_committed: state.total_batches_committed,
            });
        }
        let is_valid = self.proof_verifier.verify(
            &public_inputs,
            &proof.serialized_proof,
            &proof.recursive_aggregation_input,
        );
        if !is_valid {
            return Err(ExecutorError::ProofRejected);
        }

        state.total_batches_verified = new_total_verified;
        METRICS.batches_per_call[&Operation::Prove].observe(committed_batches.len() as u64);
        tracing::info!("Verified proof for batch #{new_total_verified}");
        Ok(())
    }

    /// Public input of a batch proof: the hash of both commitments and recursion verification key hashes,
    /// truncated to `256 - PUBLIC_INPUT_SHIFT` bits.
    fn public_input(&self, previous_commitment: H256, commitment: H256) -> U256 {
        let verifier_params = self.config.verifier_params();
        let mut preimage = [0_u8; 128];
        preimage[..32].copy_from_slice(previous_commitment.as_bytes());
        preimage[32..64].copy_from_slice(commitment.as_bytes());
        preimage[64..96].copy_from_slice(verifier_params.recursion_node_level_vk_hash.as_bytes());
        preimage[96..].copy_from_slice(verifier_params.recursion_leaf_level_vk_hash.as_bytes());
        h256_to_u256(H256(keccak256(&preimage))) & (U256::MAX >> PUBLIC_INPUT_SHIFT)
    }

    /// Executes `batches`, which must directly follow the last executed batch. Priority operations
    /// processed in the batches are removed from `priority_queue`.
    pub fn execute_batches<Q: PriorityQueue + Clone>(
        &self,
        state: &mut ExecutorState,
        priority_queue: &mut Q,
        batches: &[StoredBatchInfo],
    ) -> Result<(), ExecutorError> {
        let latency = METRICS.operation_latency[&Operation::Execute].start();
        let result = Self::try_execute_batches(state, priority_queue, batches);
        latency.observe();
        Self::report(Operation::Execute, state, result)
    }

    fn try_execute_batches<Q: PriorityQueue + Clone>(
        state: &mut ExecutorState,
        priority_queue: &mut Q,
        batches: &[StoredBatchInfo],
    ) -> Result<(), ExecutorError> {
        let total_executed = state.total_batches_executed;
        let mut pending_queue = priority_queue.clone();
        let mut l2_logs_tree_roots = Vec::with_capacity(batches.len());
        for (position, batch) in batches.iter().enumerate() {
            let expected_number = total_executed + position as u64 + 1;
            if batch.batch_number != expected_number {
                return Err(ExecutorError::OutOfOrderExecution {
                    expected: expected_number,
                    actual: batch.batch_number,
                });
            }
            if !state.is_stored(expected_number, batch) {
                return Err(ExecutorError::NotCommitted {
                    batch_number: expected_number,
                });
            }

            let priority_operations_hash =
                collect_priority_operations(&mut pending_queue, batch.number_of_layer1_txs)?;
            if priority_operations_hash != batch.priority_operations_hash {
                return Err(ExecutorError::PriorityHashMismatch {
                    expected: batch.priority_operations_hash,
                    actual: priority_operations_hash,
                });
            }
            l2_logs_tree_roots.push((expected_number, batch.l2_logs_tree_root));
        }

        let new_total_executed = total_executed + batches.len() as u64;
        if new_total_executed > state.total_batches_verified {
            return Err(ExecutorError::ExecutedExceedsVerified {
                executed: new_total_executed,
                verified: state.total_batches_verified,
            });
        }

        state.l2_logs_tree_roots.extend(l2_logs_tree_roots);
        state.total_batches_executed = new_total_executed;
        if let Some(upgrade_batch_number) = state.upgrade.batch_number {
            if upgrade_batch_number <= new_total_executed {
                tracing::info!(
                    "System contracts upgrade committed in batch #{upgrade_batch_number} is executed"
                );
                state.upgrade = Default::default();
            }
        }
        *priority_queue = pending_queue;

        METRICS.batches_per_call[&Operation::Execute].observe(batches.len() as u64);
        if !batches.is_empty() {
            tracing::info!(
                "Executed batches #{}..=#{new_total_executed}",
                total_executed + 1
            );
        }
        Ok(())
    }

    /// Reverts committed batches after `new_last_batch`. Executed batches cannot be reverted.
    pub fn revert_batches(
        &self,
        state: &mut ExecutorState,
        new_last_batch: u64,
    ) -> Result<(), ExecutorError> {
        let latency = METRICS.operation_latency[&Operation::Revert].start();
        let result = Self::try_revert_batches(state, new_last_batch);
        latency.observe();
        Self::report(Operation::Revert, state, result)
    }

    fn try_revert_batches(
        state: &mut ExecutorState,
        new_last_batch: u64,
    ) -> Result<(), ExecutorError> {
        if new_last_batch < state.total_batches_executed {
            return Err(ExecutorError::CannotRevertExecuted {
                new_last_batch,
                total_executed: state.total_batches_executed,
            });
        }
        if new_last_batch >= state.total_batches_committed {
            return Err(ExecutorError::NothingToRevert {
                new_last_batch,
                total_committed: state.total_batches_committed,
            });
        }

        let reverted_count = state.total_batches_committed - new_last_batch;
        state.total_batches_verified = state.total_batches_verified.min(new_last_batch);
        state.total_batches_committed = new_last_batch;
        // The scheduled upgrade transaction stays pending and must be committed again.
        if state.upgrade.batch_number > Some(new_last_batch) {
            state.upgrade.batch_number = None;
        }
        tracing::info!("Reverted {reverted_count} batches; last committed batch is #{new_last_batch}");
        Ok(())
    }
}
