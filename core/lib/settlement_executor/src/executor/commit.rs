use zksync_settlement_types::{CommitBatchInfo, StoredBatchInfo, H256, U256};

use super::BatchExecutor;
use crate::{
    da::PubdataCommitments,
    errors::ExecutorError,
    logs::{process_system_logs, LogProcessingOutput},
    metrics::{Operation, METRICS},
    state::ExecutorState,
    traits::SettlementEnv,
};

/// Batch checked by [`BatchExecutor::commit_one_batch()`], not yet applied to the state.
#[derive(Debug)]
struct CheckedBatch<'a> {
    stored: StoredBatchInfo,
    inline_pubdata: Option<&'a [u8]>,
}

impl BatchExecutor {
    /// Commits `new_batches` on top of `last_committed_batch`, which must be the last committed batch
    /// known to the state. Returns the stored records of the new batches; these must be supplied
    /// to prove and execute the batches later.
    pub fn commit_batches<E: SettlementEnv>(
        &self,
        state: &mut ExecutorState,
        env: &E,
        last_committed_batch: &StoredBatchInfo,
        new_batches: &[CommitBatchInfo],
    ) -> Result<Vec<StoredBatchInfo>, ExecutorError> {
        let latency = METRICS.operation_latency[&Operation::Commit].start();
        let result = self.try_commit_batches(state, env, last_committed_batch, new_batches);
        latency.observe();
        Self::report(Operation::Commit, state, result)
    }

    fn try_commit_batches<E: SettlementEnv>(
        &self,
        state: &mut ExecutorState,
        env: &E,
        last_committed_batch: &StoredBatchInfo,
        new_batches: &[CommitBatchInfo],
    ) -> Result<Vec<StoredBatchInfo>, ExecutorError> {
        let expected_hash = state
            .stored_batch_hash(state.total_batches_committed)
            .unwrap_or_default();
        let actual_hash = last_committed_batch.hash();
        if expected_hash != actual_hash {
            return Err(ExecutorError::PreviousBatchMismatch {
                expected: expected_hash,
                actual: actual_hash,
            });
        }
        let Some(first_batch) = new_batches.first() else {
            return Err(ExecutorError::EmptyBatchSet);
        };

        // Only the first batch committed after scheduling an upgrade may contain the upgrade transaction.
        let upgrade_tx_hash = state.upgrade.expected_tx_hash();
        let mut checked_batches: Vec<CheckedBatch<'_>> = Vec::with_capacity(new_batches.len());
        for (i, batch) in new_batches.iter().enumerate() {
            let previous = checked_batches
                .last()
                .map_or(last_committed_batch, |checked| &checked.stored);
            let expected_upgrade_tx_hash = if i == 0 {
                upgrade_tx_hash
            } else {
                H256::zero()
            };
            let expected_number = state.total_batches_committed + i as u64 + 1;
            let checked = self.commit_one_batch(
                env,
                previous,
                expected_number,
                batch,
                expected_upgrade_tx_hash,
            )?;
            tracing::debug!(
                batch_number = batch.batch_number,
                commitment = ?checked.stored.commitment,
                "Checked batch for commit"
            );
            checked_batches.push(checked);
        }

        for checked in &checked_batches {
            state.store_batch_hash(checked.stored.batch_number, checked.stored.hash());
        }
        state.total_batches_committed += new_batches.len() as u64;
        if !upgrade_tx_hash.is_zero() {
            state.upgrade.batch_number = Some(first_batch.batch_number);
            tracing::info!(
                "System contracts upgrade {upgrade_tx_hash:?} is committed in batch #{}",
                first_batch.batch_number
            );
        }
        METRICS.batches_per_call[&Operation::Commit].observe(new_batches.len() as u64);
        tracing::info!(
            "Committed batches #{}..=#{}",
            first_batch.batch_number,
            state.total_batches_committed
        );

        if self.config.relay_inline_pubdata {
            if let Some(relay) = &self.pubdata_relay {
                for pubdata in checked_batches.iter().filter_map(|checked| checked.inline_pubdata) {
                    relay.send_to_l1(self.config.chain_id, pubdata);
                }
            }
        }
        Ok(checked_batches
            .into_iter()
            .map(|checked| checked.stored)
            .collect())
    }

    fn commit_one_batch<'a, E: SettlementEnv>(
        &self,
        env: &E,
        previous: &StoredBatchInfo,
        expected_number: u64,
        batch: &'a CommitBatchInfo,
        expected_upgrade_tx_hash: H256,
    ) -> Result<CheckedBatch<'a>, ExecutorError> {
        // Stored hashes are indexed by batch number, so numbering follows the committed counter.
        if batch.batch_number != expected_number {
            return Err(ExecutorError::NonSequentialBatch {
                expected: expected_number,
                actual: batch.batch_number,
            });
        }

        let pubdata_commitments = PubdataCommitments::parse(&batch.pubdata_commitments)?;
        let log_output = process_system_logs(
            &batch.system_logs,
            pubdata_commitments.source(),
            expected_upgrade_tx_hash,
        )?;
        let blob_commitments = self
            .da_verifier
            .verify(pubdata_commitments, &log_output, env)?;
        let commitment = self
            .commitment_builder
            .build(batch, &log_output, blob_commitments)?
            .hash()
            .commitment;

        self.verify_timestamps(env, previous, batch.timestamp, &log_output)?;
        if previous.batch_hash != log_output.previous_batch_hash {
            return Err(ExecutorError::ChainMismatch {
                expected: previous.batch_hash,
                actual: log_output.previous_batch_hash,
            });
        }
        if log_output.chained_priority_txs_hash != batch.priority_operations_hash {
            return Err(ExecutorError::PriorityHashMismatch {
                expected: log_output.chained_priority_txs_hash,
                actual: batch.priority_operations_hash,
            });
        }
        if log_output.number_of_layer1_txs != batch.number_of_layer1_txs {
            return Err(ExecutorError::TxCountMismatch {
                expected: log_output.number_of_layer1_txs,
                actual: batch.number_of_layer1_txs,
            });
        }

        let stored = StoredBatchInfo {
            batch_number: batch.batch_number,
            batch_hash: batch.new_state_root,
            index_repeated_storage_changes: batch.index_repeated_storage_changes,
            number_of_layer1_txs: batch.number_of_layer1_txs,
            priority_operations_hash: batch.priority_operations_hash,
            l2_logs_tree_root: log_output.l2_logs_tree_root,
            timestamp: batch.timestamp.into(),
            commitment,
        };
        let inline_pubdata = match pubdata_commitments {
            PubdataCommitments::Inline(pubdata) => Some(pubdata),
            PubdataCommitments::BlobReferenced(_) => None,
        };
        Ok(CheckedBatch {
            stored,
            inline_pubdata,
        })
    }

    fn verify_timestamps<E: SettlementEnv>(
        &self,
        env: &E,
        previous: &StoredBatchInfo,
        declared_timestamp: u64,
        log_output: &LogProcessingOutput,
    ) -> Result<(), ExecutorError> {
        let batch_timestamp = log_output.batch_timestamp();
        if batch_timestamp != U256::from(declared_timestamp) {
            return Err(ExecutorError::TimestampMismatch {
                declared: declared_timestamp,
                from_logs: batch_timestamp,
            });
        }
        if batch_timestamp <= previous.timestamp {
            return Err(ExecutorError::NonIncreasingTimestamp {
                previous: previous.timestamp,
                timestamp: batch_timestamp,
            });
        }

        let last_l2_block_timestamp = log_output.last_l2_block_timestamp();
        if batch_timestamp > last_l2_block_timestamp {
            return Err(ExecutorError::TimestampAfterLastL2Block {
                timestamp: batch_timestamp,
                last_l2_block_timestamp,
            });
        }

        let now = env.block_timestamp();
        let min_timestamp = now.saturating_sub(self.config.commit_timestamp_not_older().as_secs());
        if batch_timestamp < U256::from(min_timestamp) {
            return Err(ExecutorError::TimestampTooOld {
                timestamp: batch_timestamp,
                min: min_timestamp,
            });
        }
        let max_timestamp =
            now.saturating_add(self.config.commit_timestamp_approximation_delta().as_secs());
        if last_l2_block_timestamp > U256::from(max_timestamp) {
            return Err(ExecutorError::TimestampTooNew {
                timestamp: last_l2_block_timestamp,
                max: max_timestamp,
            });
        }
        Ok(())
    }
}
