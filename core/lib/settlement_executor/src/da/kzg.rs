//! Native EIP-4844 point evaluation.

use zksync_settlement_crypto::kzg::kzg_commitment_to_versioned_hash;
use zksync_settlement_types::{H256, U256};

use super::{BLS_MODULUS, FIELD_ELEMENTS_PER_BLOB, POINT_EVALUATION_INPUT_SIZE};
use crate::traits::{PointEvaluation, PointEvaluationError};

/// Point evaluation backed by `kzg-rs` and the Ethereum trusted setup. Mirrors the semantics
/// of the point evaluation precompile.
#[derive(Debug, Clone, Copy, Default)]
pub struct KzgPointEvaluation;

fn split_input(
    input: &[u8; POINT_EVALUATION_INPUT_SIZE],
) -> (H256, [u8; 32], [u8; 32], [u8; 48], [u8; 48]) {
    let mut z = [0_u8; 32];
    z.copy_from_slice(&input[32..64]);
    let mut y = [0_u8; 32];
    y.copy_from_slice(&input[64..96]);
    let mut commitment = [0_u8; 48];
    commitment.copy_from_slice(&input[96..144]);
    let mut proof = [0_u8; 48];
    proof.copy_from_slice(&input[144..]);
    (H256::from_slice(&input[..32]), z, y, commitment, proof)
}

impl PointEvaluation for KzgPointEvaluation {
    fn evaluate(
        &self,
        input: &[u8; POINT_EVALUATION_INPUT_SIZE],
    ) -> Result<[U256; 2], PointEvaluationError> {
        let (versioned_hash, z, y, commitment, proof) = split_input(input);
        if kzg_commitment_to_versioned_hash(&commitment) != versioned_hash {
            return Err(PointEvaluationError::VersionedHashMismatch);
        }

        let is_valid = kzg_rs::KzgProof::verify_kzg_proof(
            &kzg_rs::Bytes48(commitment),
            &kzg_rs::Bytes32(z),
            &kzg_rs::Bytes32(y),
            &kzg_rs::Bytes48(proof),
            &kzg_rs::get_kzg_settings(),
        )
        .map_err(|err| PointEvaluationError::InvalidInput(format!("{err:?}")))?;
        if !is_valid {
            return Err(PointEvaluationError::ProofVerificationFailed);
        }
        Ok([FIELD_ELEMENTS_PER_BLOB.into(), BLS_MODULUS])
    }
}
