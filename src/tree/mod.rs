//! Artifact hash tree
//!
//! Represents an artifact's chunked content as a binary hash tree whose root
//! digest is the artifact fingerprint.

pub mod builder;
pub mod hasher;
pub mod leaves;
pub mod node;
pub mod trace;

pub use builder::{build, build_root};
pub use leaves::{extract_leaves, LeafExtractor};
pub use node::{NodeHandle, Tree, TreeNode};
pub use trace::{parse_trace, write_trace, TraceIndex, TraceRecord, TraceSink, TraceWriter};
