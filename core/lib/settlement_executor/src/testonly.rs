//! Test utilities shared by unit tests of the crate.

use std::sync::Mutex;

use zksync_settlement_types::{system_logs::SystemLogKey, u256_to_h256, L2ToL1Log, H256, U256};

use crate::{
    da::{BLS_MODULUS, FIELD_ELEMENTS_PER_BLOB, POINT_EVALUATION_INPUT_SIZE},
    traits::{
        BlobHashSource, PointEvaluation, PointEvaluationError, ProofVerifier, PubdataRelay,
        SettlementEnv,
    },
};

const KEY_COUNT: usize = 10;

pub(crate) fn system_log(key: SystemLogKey, value: H256) -> L2ToL1Log {
    L2ToL1Log {
        shard_id: 0,
        is_service: true,
        tx_number_in_block: 0,
        sender: key.authorized_sender(),
        key: u256_to_h256((key as u8).into()),
        value,
    }
}

/// Builder of packed system logs. By default, contains zero-valued logs for all keys
/// except for the upgrade transaction hash.
#[derive(Debug, Clone)]
pub(crate) struct SystemLogsBuilder {
    values: [Option<H256>; KEY_COUNT],
}

impl SystemLogsBuilder {
    pub fn new() -> Self {
        let mut values = [Some(H256::zero()); KEY_COUNT];
        values[SystemLogKey::ExpectedSystemContractUpgradeTxHash as usize] = None;
        Self { values }
    }

    pub fn with_value(mut self, key: SystemLogKey, value: H256) -> Self {
        self.values[key as usize] = Some(value);
        self
    }

    pub fn with_u256(self, key: SystemLogKey, value: U256) -> Self {
        self.with_value(key, u256_to_h256(value))
    }

    pub fn with_timestamps(self, batch_timestamp: u64, last_l2_block_timestamp: u64) -> Self {
        let packed = (U256::from(batch_timestamp) << 128) + U256::from(last_l2_block_timestamp);
        self.with_u256(SystemLogKey::PackedBatchAndL2BlockTimestamp, packed)
    }

    pub fn without(mut self, key: SystemLogKey) -> Self {
        self.values[key as usize] = None;
        self
    }

    pub fn logs(&self) -> Vec<L2ToL1Log> {
        (0..KEY_COUNT)
            .filter_map(|i| {
                let value = self.values[i]?;
                let key = SystemLogKey::try_from(i as u8).unwrap();
                Some(system_log(key, value))
            })
            .collect()
    }

    pub fn build(&self) -> Vec<u8> {
        self.logs().iter().flat_map(L2ToL1Log::to_bytes).collect()
    }
}

/// Settlement environment with fixed timestamp and blob hashes.
#[derive(Debug, Clone, Default)]
pub(crate) struct TestEnv {
    pub timestamp: u64,
    pub blob_hashes: Vec<H256>,
}

impl TestEnv {
    pub fn new(timestamp: u64) -> Self {
        Self {
            timestamp,
            blob_hashes: vec![],
        }
    }

    pub fn with_blob_hashes(mut self, hashes: impl IntoIterator<Item = H256>) -> Self {
        self.blob_hashes = hashes.into_iter().collect();
        self
    }
}

impl BlobHashSource for TestEnv {
    fn blob_hash(&self, index: usize) -> H256 {
        self.blob_hashes.get(index).copied().unwrap_or_default()
    }
}

impl SettlementEnv for TestEnv {
    fn block_timestamp(&self) -> u64 {
        self.timestamp
    }
}

/// Point evaluation returning a fixed outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MockPointEvaluation {
    Valid,
    WrongModulus,
    Failing,
}

impl PointEvaluation for MockPointEvaluation {
    fn evaluate(
        &self,
        _input: &[u8; POINT_EVALUATION_INPUT_SIZE],
    ) -> Result<[U256; 2], PointEvaluationError> {
        let field_elements = U256::from(FIELD_ELEMENTS_PER_BLOB);
        match self {
            Self::Valid => Ok([field_elements, BLS_MODULUS]),
            Self::WrongModulus => Ok([field_elements, BLS_MODULUS - 1]),
            Self::Failing => Err(PointEvaluationError::ProofVerificationFailed),
        }
    }
}

/// Proof verifier with a fixed verdict, recording public inputs it was called with.
#[derive(Debug)]
pub(crate) struct MockProofVerifier {
    accepts: bool,
    pub calls: Mutex<Vec<Vec<U256>>>,
}

impl MockProofVerifier {
    pub fn new(accepts: bool) -> Self {
        Self {
            accepts,
            calls: Mutex::default(),
        }
    }
}

impl ProofVerifier for MockProofVerifier {
    fn verify(
        &self,
        public_inputs: &[U256],
        _proof: &[U256],
        _recursive_aggregation_input: &[U256],
    ) -> bool {
        self.calls.lock().unwrap().push(public_inputs.to_vec());
        self.accepts
    }
}

/// Pubdata relay recording sent pubdata.
#[derive(Debug, Default)]
pub(crate) struct RecordingRelay {
    pub sent: Mutex<Vec<(u64, Vec<u8>)>>,
}

impl PubdataRelay for RecordingRelay {
    fn send_to_l1(&self, chain_id: u64, pubdata: &[u8]) {
        self.sent.lock().unwrap().push((chain_id, pubdata.to_vec()));
    }
}
