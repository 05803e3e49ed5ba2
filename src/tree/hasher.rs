//! Digest computation for tree nodes using SHA-256
//!
//! Leaves hash their raw text. Internal nodes hash the concatenation of their
//! children's *hex* digest strings:
//!
//! digest = SHA256_hex(left.digest || right.digest)
//!
//! The hex-level concatenation is the fingerprint compatibility contract and
//! must not change. It carries a known weakness: there is no domain separation
//! between leaf and internal hashing, so a leaf whose text happens to be a
//! 128-character pair of digests hashes like an internal node.

use crate::types::HexDigest;
use sha2::{Digest, Sha256};

/// Compute the lowercase hex SHA-256 digest of `content`
pub fn digest_hex(content: &str) -> HexDigest {
    hex::encode(Sha256::digest(content.as_bytes()))
}

/// Content of an internal node: the two child digests concatenated
pub fn parent_content(left: &str, right: &str) -> String {
    let mut content = String::with_capacity(left.len() + right.len());
    content.push_str(left);
    content.push_str(right);
    content
}

/// Combine two child digests into their parent's digest
pub fn combine(left: &str, right: &str) -> HexDigest {
    digest_hex(&parent_content(left, right))
}
