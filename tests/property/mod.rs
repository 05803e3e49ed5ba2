//! Property-based tests for tree and proof guarantees

mod determinism;
