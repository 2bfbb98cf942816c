//! Identifiers of EIP-4844 blobs.

use sha2::{Digest, Sha256};
use zksync_settlement_types::H256;

/// Version byte of KZG-based versioned hashes.
pub const VERSIONED_HASH_VERSION_KZG: u8 = 0x01;

/// Given a compressed KZG commitment, calculates the versioned hash of the blob it commits to:
/// `sha256(commitment)` with the first byte replaced by [`VERSIONED_HASH_VERSION_KZG`].
pub fn kzg_commitment_to_versioned_hash(kzg_commitment: &[u8; 48]) -> H256 {
    let mut versioned_hash: [u8; 32] = Sha256::digest(kzg_commitment).into();
    versioned_hash[0] = VERSIONED_HASH_VERSION_KZG;
    H256(versioned_hash)
}
