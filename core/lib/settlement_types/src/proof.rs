use serde::{Deserialize, Serialize};

use crate::{H256, U256};

/// Proof bundle submitted with `proveBatches`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofInput {
    pub recursive_aggregation_input: Vec<U256>,
    pub serialized_proof: Vec<U256>,
}

/// Hashes of the recursion verification keys the batch proof public input is bound to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierParams {
    pub recursion_node_level_vk_hash: H256,
    pub recursion_leaf_level_vk_hash: H256,
    pub recursion_circuits_set_vks_hash: H256,
}
