//! Single-hop consistency check between two leaf sequences
//!
//! This is deliberately weak: it only recognises an unchanged tree, or a new
//! root that equals `SHA256_hex(old_root || new_root)`. It is not a general
//! Merkle consistency proof over arbitrary tree shapes, and a `NotComparable`
//! outcome does not prove the sequences are inconsistent.

use crate::tree::builder::build_root;
use crate::tree::hasher::combine;
use crate::types::HexDigest;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ConsistencyOutcome {
    /// Both sequences produce the same root
    Identical { root_a: HexDigest, root_b: HexDigest },
    /// Combining the earlier root with the later root reproduces the later root
    Extended {
        root_a: HexDigest,
        combined: HexDigest,
        root_b: HexDigest,
    },
    /// Not a prefix relation, empty input, or no single-hop link
    NotComparable,
}

impl ConsistencyOutcome {
    /// Ordered evidence digests; empty when not comparable
    pub fn evidence(&self) -> Vec<&str> {
        match self {
            ConsistencyOutcome::Identical { root_a, root_b } => vec![root_a.as_str(), root_b.as_str()],
            ConsistencyOutcome::Extended {
                root_a,
                combined,
                root_b,
            } => vec![root_a.as_str(), combined.as_str(), root_b.as_str()],
            ConsistencyOutcome::NotComparable => vec![],
        }
    }

    pub fn is_consistent(&self) -> bool {
        !matches!(self, ConsistencyOutcome::NotComparable)
    }
}

/// Check whether the tree over `later` is a linear extension of the tree over `earlier`
pub fn check_consistency<A, B>(earlier: &[A], later: &[B]) -> ConsistencyOutcome
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    if !is_prefix(earlier, later) {
        debug!(
            earlier = earlier.len(),
            later = later.len(),
            "Sequences are not in a prefix relation"
        );
        return ConsistencyOutcome::NotComparable;
    }

    let (root_a, root_b) = match (build_root(earlier), build_root(later)) {
        (Ok(a), Ok(b)) => (a, b),
        _ => return ConsistencyOutcome::NotComparable,
    };

    if root_a == root_b {
        return ConsistencyOutcome::Identical { root_a, root_b };
    }

    let combined = combine(&root_a, &root_b);
    if combined == root_b {
        return ConsistencyOutcome::Extended {
            root_a,
            combined,
            root_b,
        };
    }

    debug!(%root_a, %root_b, "No single-hop link between roots");
    ConsistencyOutcome::NotComparable
}

fn is_prefix<A: AsRef<str>, B: AsRef<str>>(earlier: &[A], later: &[B]) -> bool {
    !earlier.is_empty()
        && earlier.len() <= later.len()
        && earlier
            .iter()
            .zip(later)
            .all(|(a, b)| a.as_ref() == b.as_ref())
}
