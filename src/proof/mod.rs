//! Inclusion and consistency proofs over leaf sequences

pub mod consistency;
pub mod inclusion;

pub use consistency::{check_consistency, ConsistencyOutcome};
pub use inclusion::{
    check_inclusion, prove_inclusion, prove_inclusion_at, InclusionProof, ProofStep, Side,
};
