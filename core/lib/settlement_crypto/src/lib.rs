//! Hashing primitives shared by the settlement crates.

pub mod hasher;
pub mod kzg;
