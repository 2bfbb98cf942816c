//! Verification of Merkle proofs against roots stored by the settlement layer, and a small
//! in-memory Merkle tree producing such roots and proofs.
//!
//! Trees are binary and position-ordered: a parent is always `hash(left, right)`, where the
//! side of a node is given by the corresponding bit of its index.

// Linter settings.
#![warn(missing_debug_implementations, bare_trait_objects)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::must_use_candidate, clippy::module_name_repetitions)]

pub use self::{
    errors::MerkleError,
    tree::MiniMerkleTree,
    verify::{calculate_root, calculate_root_for_range, MAX_TREE_HEIGHT},
};

mod errors;
mod tree;
mod verify;
