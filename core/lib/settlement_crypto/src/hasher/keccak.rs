use zksync_settlement_types::{keccak256, H256};

use crate::hasher::Hasher;

#[derive(Default, Clone, Copy, Debug)]
pub struct KeccakHasher;

impl Hasher for KeccakHasher {
    type Hash = H256;

    fn hash_bytes(&self, value: &[u8]) -> H256 {
        H256(keccak256(value))
    }

    fn compress(&self, lhs: &H256, rhs: &H256) -> H256 {
        let mut bytes = [0_u8; 64];
        bytes[..32].copy_from_slice(lhs.as_bytes());
        bytes[32..].copy_from_slice(rhs.as_bytes());
        H256(keccak256(&bytes))
    }
}
