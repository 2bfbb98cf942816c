//! Interfaces of the external collaborators of the executor.

use std::fmt;

use zksync_settlement_types::{H256, U256};

use crate::da::POINT_EVALUATION_INPUT_SIZE;

/// Verifier of batch validity proofs.
pub trait ProofVerifier: fmt::Debug + Send + Sync {
    /// Checks `proof` against `public_inputs`. Returns `false` if the proof is invalid.
    fn verify(
        &self,
        public_inputs: &[U256],
        proof: &[U256],
        recursive_aggregation_input: &[U256],
    ) -> bool;
}

/// Error returned by a [`PointEvaluation`] call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PointEvaluationError {
    #[error("versioned hash does not correspond to the KZG commitment")]
    VersionedHashMismatch,
    #[error("malformed point evaluation input: {0}")]
    InvalidInput(String),
    #[error("KZG opening proof does not verify")]
    ProofVerificationFailed,
}

/// EIP-4844 point evaluation primitive.
///
/// The input is `versioned_hash | z | y | commitment | proof`. On success, returns
/// `[FIELD_ELEMENTS_PER_BLOB, BLS_MODULUS]`.
pub trait PointEvaluation: fmt::Debug + Send + Sync {
    fn evaluate(
        &self,
        input: &[u8; POINT_EVALUATION_INPUT_SIZE],
    ) -> Result<[U256; 2], PointEvaluationError>;
}

/// Source of versioned hashes of the blobs attached to the current settlement transaction.
pub trait BlobHashSource {
    /// Returns the versioned hash of the blob with the specified index, or zero if there is no such blob.
    fn blob_hash(&self, index: usize) -> H256;
}

/// Environment of the current settlement transaction.
pub trait SettlementEnv: BlobHashSource + fmt::Debug + Send + Sync {
    /// Timestamp of the settlement layer block, in seconds.
    fn block_timestamp(&self) -> u64;
}

/// Sink re-publishing verified inline pubdata to the settlement layer.
pub trait PubdataRelay: fmt::Debug + Send + Sync {
    fn send_to_l1(&self, chain_id: u64, pubdata: &[u8]);
}
