//! Data availability verification of committed batches.

use std::sync::Arc;

use zksync_settlement_types::{
    keccak256,
    pubdata::{
        MAX_NUMBER_OF_BLOBS, PUBDATA_COMMITMENT_CLAIMED_VALUE_OFFSET,
        PUBDATA_COMMITMENT_COMMITMENT_OFFSET, PUBDATA_COMMITMENT_SIZE,
    },
    PubdataSource, H256, U256,
};

pub use self::kzg::KzgPointEvaluation;
use crate::{
    errors::DaError,
    logs::LogProcessingOutput,
    traits::{BlobHashSource, PointEvaluation},
};

mod kzg;

/// Size of the point evaluation input: `versioned_hash | z | y | commitment | proof`.
pub const POINT_EVALUATION_INPUT_SIZE: usize = 192;
/// Number of field elements in a blob; the first word of the point evaluation output.
pub const FIELD_ELEMENTS_PER_BLOB: u64 = 4_096;
/// Modulus of the BLS12-381 scalar field; the second word of the point evaluation output.
pub const BLS_MODULUS: U256 = U256([
    0xffff_ffff_0000_0001,
    0x53bd_a402_fffe_5bfe,
    0x3339_d808_09a1_d805,
    0x73ed_a753_299d_7d48,
]);

/// Parsed `pubdata_commitments` of a committed batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PubdataCommitments<'a> {
    /// Pubdata published inline.
    Inline(&'a [u8]),
    /// Packed KZG openings of the blobs attached to the transaction.
    BlobReferenced(&'a [u8]),
}

impl<'a> PubdataCommitments<'a> {
    /// Splits the source tag off the commitments buffer.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, DaError> {
        let (&tag, payload) = bytes
            .split_first()
            .ok_or(DaError::EmptyPubdataCommitments)?;
        match PubdataSource::try_from(tag) {
            Ok(PubdataSource::Calldata) => Ok(Self::Inline(payload)),
            Ok(PubdataSource::Blob) => Ok(Self::BlobReferenced(payload)),
            Err(_) => Err(DaError::UnsupportedPubdataSource(tag)),
        }
    }

    pub fn source(&self) -> PubdataSource {
        match self {
            Self::Inline(_) => PubdataSource::Calldata,
            Self::BlobReferenced(_) => PubdataSource::Blob,
        }
    }
}

/// Verifies pubdata of committed batches against the values in their system logs.
#[derive(Debug, Clone)]
pub struct DaVerifier {
    point_evaluation: Arc<dyn PointEvaluation>,
    max_inline_pubdata_bytes: usize,
}

impl DaVerifier {
    pub fn new(point_evaluation: Arc<dyn PointEvaluation>, max_inline_pubdata_bytes: usize) -> Self {
        Self {
            point_evaluation,
            max_inline_pubdata_bytes,
        }
    }

    /// Verifies pubdata commitments of a batch. Returns per-blob commitments to be included
    /// into the auxiliary output of the batch; they are zero for inline pubdata and unused blob slots.
    pub fn verify(
        &self,
        commitments: PubdataCommitments<'_>,
        log_output: &LogProcessingOutput,
        blob_hashes: &dyn BlobHashSource,
    ) -> Result<[H256; MAX_NUMBER_OF_BLOBS], DaError> {
        match commitments {
            PubdataCommitments::Inline(pubdata) => {
                self.verify_inline(pubdata, log_output.pubdata_hash)?;
                Ok([H256::zero(); MAX_NUMBER_OF_BLOBS])
            }
            PubdataCommitments::BlobReferenced(slots) => {
                self.verify_blobs(slots, &log_output.blob_hashes, blob_hashes)
            }
        }
    }

    fn verify_inline(&self, pubdata: &[u8], expected_hash: H256) -> Result<(), DaError> {
        if pubdata.len() > self.max_inline_pubdata_bytes {
            return Err(DaError::PubdataTooLarge {
                len: pubdata.len(),
                max: self.max_inline_pubdata_bytes,
            });
        }
        let actual = H256(keccak256(pubdata));
        if actual != expected_hash {
            return Err(DaError::PubdataHashMismatch {
                expected: expected_hash,
                actual,
            });
        }
        Ok(())
    }

    fn verify_blobs(
        &self,
        slots: &[u8],
        log_blob_hashes: &[H256; MAX_NUMBER_OF_BLOBS],
        blob_hashes: &dyn BlobHashSource,
    ) -> Result<[H256; MAX_NUMBER_OF_BLOBS], DaError> {
        if slots.is_empty() || slots.len() % PUBDATA_COMMITMENT_SIZE != 0 {
            return Err(DaError::MalformedPubdataCommitments { len: slots.len() });
        }
        let blob_count = slots.len() / PUBDATA_COMMITMENT_SIZE;
        if blob_count > MAX_NUMBER_OF_BLOBS {
            return Err(DaError::TooManyBlobs {
                count: blob_count,
                max: MAX_NUMBER_OF_BLOBS,
            });
        }

        let mut blob_commitments = [H256::zero(); MAX_NUMBER_OF_BLOBS];
        for (index, slot) in slots.chunks_exact(PUBDATA_COMMITMENT_SIZE).enumerate() {
            let versioned_hash = blob_hashes.blob_hash(index);
            if versioned_hash.is_zero() {
                return Err(DaError::MissingBlobHash { index });
            }
            self.verify_opening(index, versioned_hash, slot)?;

            let mut digest_input = [0_u8; 32 + PUBDATA_COMMITMENT_COMMITMENT_OFFSET];
            digest_input[..32].copy_from_slice(versioned_hash.as_bytes());
            digest_input[32..].copy_from_slice(&slot[..PUBDATA_COMMITMENT_COMMITMENT_OFFSET]);
            blob_commitments[index] = H256(keccak256(&digest_input));
        }

        if !blob_hashes.blob_hash(blob_count).is_zero() {
            return Err(DaError::ExtraBlobDetected { index: blob_count });
        }

        let pairs = log_blob_hashes.iter().zip(&blob_commitments);
        for (index, (log_hash, commitment)) in pairs.enumerate() {
            if log_hash.is_zero() != commitment.is_zero() {
                return Err(DaError::BlobHashCommitmentMismatch { index });
            }
        }
        Ok(blob_commitments)
    }

    fn verify_opening(&self, index: usize, versioned_hash: H256, slot: &[u8]) -> Result<(), DaError> {
        let input = point_evaluation_input(versioned_hash, slot);
        let output = self
            .point_evaluation
            .evaluate(&input)
            .map_err(|err| DaError::InvalidBlobProof {
                index,
                source: Some(err),
            })?;
        if output[1] != BLS_MODULUS {
            return Err(DaError::InvalidBlobProof {
                index,
                source: None,
            });
        }
        Ok(())
    }
}

/// Builds the point evaluation input from a packed 144-byte commitment slot. The 16-byte opening
/// point is left-padded to a 32-byte word.
pub fn point_evaluation_input(
    versioned_hash: H256,
    slot: &[u8],
) -> [u8; POINT_EVALUATION_INPUT_SIZE] {
    let mut input = [0_u8; POINT_EVALUATION_INPUT_SIZE];
    input[..32].copy_from_slice(versioned_hash.as_bytes());
    input[48..64].copy_from_slice(&slot[..PUBDATA_COMMITMENT_CLAIMED_VALUE_OFFSET]);
    input[64..].copy_from_slice(&slot[PUBDATA_COMMITMENT_CLAIMED_VALUE_OFFSET..]);
    input
}
