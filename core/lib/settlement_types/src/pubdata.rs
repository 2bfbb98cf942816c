//! Layout of the `pubdata_commitments` field of `CommitBatchInfo`.

use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Source of the pubdata of a batch; the first byte of `pubdata_commitments`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TryFromPrimitive, Display,
)]
#[repr(u8)]
pub enum PubdataSource {
    /// Pubdata is published inline as a part of the commit calldata.
    #[default]
    Calldata = 0,
    /// Pubdata is published as EIP-4844 blobs; only their KZG openings are in the calldata.
    Blob = 1,
}

/// Maximum number of blobs a single batch may reference.
pub const MAX_NUMBER_OF_BLOBS: usize = 2;

/// Packed blob commitment: opening point (16 bytes) || claimed value (32 bytes)
/// || commitment (48 bytes) || opening proof (48 bytes).
pub const PUBDATA_COMMITMENT_SIZE: usize = 144;
pub const PUBDATA_COMMITMENT_CLAIMED_VALUE_OFFSET: usize = 16;
pub const PUBDATA_COMMITMENT_COMMITMENT_OFFSET: usize = 48;

/// Number of pubdata bytes a single blob may carry (4096 field elements, 31 bytes each).
pub const BLOB_SIZE_BYTES: usize = 126_976;
