//! The declaration of the types shared by the batch settlement executor crates.
//!
//! Primitive hash / integer types are re-exported from `ethabi` so that they are interchangeable
//! with the ABI encoding used by the L1 contracts.

pub use ethabi::{
    self,
    ethereum_types::{Address, H160, H256, U256},
};

#[macro_use]
mod macros;

pub mod abi;
pub mod commit_batch_info;
pub mod l2_to_l1_log;
pub mod priority_op;
pub mod proof;
pub mod pubdata;
pub mod stored_batch_info;
pub mod system_logs;


pub use self::{
    commit_batch_info::CommitBatchInfo,
    l2_to_l1_log::{L2Message, L2ToL1Log},
    priority_op::PriorityOperation,
    proof::{ProofInput, VerifierParams},
    pubdata::PubdataSource,
    stored_batch_info::StoredBatchInfo,
};

basic_type!(
    /// Unique identifier of the priority operation in the ZKsync network.
    PriorityOpId,
    u64
);

/// `keccak256("")`, the seed of the rolling priority operations hash.
pub const EMPTY_STRING_KECCAK: H256 = H256([
    0xc5, 0xd2, 0x46, 0x01, 0x86, 0xf7, 0x23, 0x3c, 0x92, 0x7e, 0x7d, 0xb2, 0xdc, 0xc7, 0x03, 0xc0,
    0xe5, 0x00, 0xb6, 0x53, 0xca, 0x82, 0x27, 0x3b, 0x7b, 0xfa, 0xd8, 0x04, 0x5d, 0x85, 0xa4, 0x70,
]);

/// Computes the Keccak-256 digest of the provided bytes.
pub fn keccak256(bytes: &[u8]) -> [u8; 32] {
    use tiny_keccak::{Hasher as _, Keccak};

    let mut output = [0_u8; 32];
    let mut hasher = Keccak::v256();
    hasher.update(bytes);
    hasher.finalize(&mut output);
    output
}

pub fn h256_to_u256(num: H256) -> U256 {
    U256::from_big_endian(num.as_bytes())
}

pub fn u256_to_h256(num: U256) -> H256 {
    let mut bytes = [0_u8; 32];
    num.to_big_endian(&mut bytes);
    H256(bytes)
}

pub fn address_to_h256(address: &Address) -> H256 {
    let mut buffer = [0_u8; 32];
    buffer[12..].copy_from_slice(address.as_bytes());
    H256(buffer)
}

/// Parses an `H256` from a fixed-bytes ABI value, checking its length.
pub fn parse_h256(bytes: &[u8]) -> anyhow::Result<H256> {
    Ok(<[u8; 32]>::try_from(bytes)?.into())
}
