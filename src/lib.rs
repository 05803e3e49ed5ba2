//! modelseal: Merkle Fingerprints for Model Artifacts
//!
//! Builds a binary hash tree over the comma-separated content of an artifact
//! file. The root digest is the artifact's fingerprint; it is recorded per
//! (name, version) and used to re-verify copies, prove leaf inclusion and
//! compare successive leaf sequences.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod proof;
pub mod registry;
pub mod store;
pub mod tree;
pub mod types;
pub mod verify;
