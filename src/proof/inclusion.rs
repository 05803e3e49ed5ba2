//! Inclusion proofs: sibling paths from one leaf up to the root
//!
//! Each step records which side the sibling sits on. A representative at an
//! even position pairs with the node to its right, one at an odd position with
//! the node to its left. When the representative is the unpaired tail of an
//! odd level it is carried up unchanged and contributes no step.

use crate::tree::builder::{level_steps, LevelStep};
use crate::tree::hasher::{combine, digest_hex};
use crate::types::{is_hex_digest, HexDigest};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Side of the sibling relative to the node being proven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    pub sibling: HexDigest,
    pub side: Side,
}

/// Proof that one leaf is part of a tree with a known root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusionProof {
    /// Position of the proven leaf in the sequence
    pub leaf_index: usize,
    /// Length of the sequence the tree was built over
    pub leaf_count: usize,
    /// Sibling digests from the leaf level upwards
    pub steps: Vec<ProofStep>,
}

impl InclusionProof {
    /// Sibling digests in path order
    pub fn siblings(&self) -> Vec<&str> {
        self.steps.iter().map(|step| step.sibling.as_str()).collect()
    }

    /// Replay the path from `leaf`, returning the root it leads to.
    ///
    /// `None` when the proof's shape does not match a tree of `leaf_count`
    /// leaves at `leaf_index`.
    pub fn root_for(&self, leaf: &str) -> Option<HexDigest> {
        let sides = path_sides(self.leaf_index, self.leaf_count)?;
        if sides.len() != self.steps.len() {
            debug!(
                expected = sides.len(),
                actual = self.steps.len(),
                "Inclusion proof has wrong length"
            );
            return None;
        }

        let mut current = digest_hex(leaf);
        for (step, side) in self.steps.iter().zip(sides) {
            if step.side != side || !is_hex_digest(&step.sibling) {
                debug!(?side, "Inclusion proof step is malformed");
                return None;
            }
            current = match side {
                Side::Left => combine(&step.sibling, &current),
                Side::Right => combine(&current, &step.sibling),
            };
        }
        Some(current)
    }
}

/// Prove the first occurrence of `leaf` in `leaves`.
///
/// `None` if the leaf does not occur.
pub fn prove_inclusion<S: AsRef<str>>(leaf: &str, leaves: &[S]) -> Option<InclusionProof> {
    let index = leaves.iter().position(|candidate| candidate.as_ref() == leaf)?;
    prove_inclusion_at(index, leaves)
}

/// Prove the leaf at `index`. `None` if the index is out of range.
pub fn prove_inclusion_at<S: AsRef<str>>(index: usize, leaves: &[S]) -> Option<InclusionProof> {
    if index >= leaves.len() {
        return None;
    }

    let mut level: Vec<HexDigest> = leaves.iter().map(|leaf| digest_hex(leaf.as_ref())).collect();
    let mut position = index;
    let mut steps = Vec::new();

    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        let mut next_position = position;

        for step in level_steps(level.len()) {
            match step {
                LevelStep::Pair { left, right } => {
                    if position == left || position == right {
                        let (sibling, side) = if position == left {
                            (right, Side::Right)
                        } else {
                            (left, Side::Left)
                        };
                        steps.push(ProofStep {
                            sibling: level[sibling].clone(),
                            side,
                        });
                        next_position = next.len();
                    }
                    next.push(combine(&level[left], &level[right]));
                }
                LevelStep::Carry { index } => {
                    if position == index {
                        next_position = next.len();
                    }
                    next.push(level[index].clone());
                }
            }
        }

        level = next;
        position = next_position;
    }

    Some(InclusionProof {
        leaf_index: index,
        leaf_count: leaves.len(),
        steps,
    })
}

/// Check that `proof` links `leaf` to `expected_root`.
///
/// Malformed proofs and mismatching roots both yield `false`.
pub fn check_inclusion(leaf: &str, proof: &InclusionProof, expected_root: &str) -> bool {
    proof
        .root_for(leaf)
        .is_some_and(|root| root == expected_root)
}

/// Sibling sides a proof for `leaf_index` in a tree of `leaf_count` leaves must have
fn path_sides(leaf_index: usize, leaf_count: usize) -> Option<Vec<Side>> {
    if leaf_index >= leaf_count {
        return None;
    }

    let mut sides = Vec::new();
    let (mut position, mut len) = (leaf_index, leaf_count);
    while len > 1 {
        if position % 2 == 1 {
            sides.push(Side::Left);
        } else if position + 1 < len {
            sides.push(Side::Right);
        }
        position /= 2;
        len = len.div_ceil(2);
    }
    Some(sides)
}
