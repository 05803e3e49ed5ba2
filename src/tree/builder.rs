//! Tree builder for folding leaf sequences into a hash tree

use crate::error::EngineError;
use crate::tree::node::{Arena, NodeHandle, Tree};
use crate::tree::trace::{TraceRecord, TraceSink};
use crate::types::HexDigest;
use std::time::Instant;
use tracing::{debug, info, instrument, trace};

/// One unit of work within a level pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LevelStep {
    /// Nodes at `left` and `left + 1` combine into a parent
    Pair { left: usize, right: usize },
    /// Trailing node of an odd level, carried forward unchanged
    Carry { index: usize },
}

/// Pairing rule shared by the builder and the proof code.
///
/// Scans a level of `len` nodes left to right in disjoint pairs. An odd
/// trailing node is carried as-is, never duplicated.
pub(crate) fn level_steps(len: usize) -> impl Iterator<Item = LevelStep> {
    (0..len).step_by(2).map(move |i| {
        if i + 1 < len {
            LevelStep::Pair { left: i, right: i + 1 }
        } else {
            LevelStep::Carry { index: i }
        }
    })
}

/// Build the tree for `leaves`, optionally recording every hashing step.
///
/// For each pairing the sink receives the left child, the right child and
/// the parent, in the order pairs are formed, level by level.
#[instrument(skip_all, fields(leaf_count = leaves.len()))]
pub fn build<S: AsRef<str>>(
    leaves: &[S],
    mut trace_sink: Option<&mut dyn TraceSink>,
) -> Result<Tree, EngineError> {
    if leaves.is_empty() {
        return Err(EngineError::EmptyInput);
    }

    let start = Instant::now();
    debug!("Starting tree build");

    let mut arena = Arena::with_capacity(leaves.len());
    let mut level: Vec<NodeHandle> = leaves
        .iter()
        .map(|leaf| arena.push_leaf(leaf.as_ref()))
        .collect();

    let mut depth = 0usize;
    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        for step in level_steps(level.len()) {
            match step {
                LevelStep::Pair { left, right } => {
                    let (left, right) = (level[left], level[right]);
                    let parent = arena.push_parent(left, right);
                    if let Some(sink) = trace_sink.as_deref_mut() {
                        emit_pairing(sink, &arena, left, right, parent)?;
                    }
                    next.push(parent);
                }
                LevelStep::Carry { index } => {
                    trace!(depth, index, "Carrying unpaired node forward");
                    next.push(level[index]);
                }
            }
        }
        level = next;
        depth += 1;
    }

    let root = level[0];
    let tree = arena.into_tree(root, leaves.len());

    info!(
        leaf_count = tree.leaf_count(),
        node_count = tree.node_count(),
        levels = depth,
        root = %tree.root_digest(),
        duration_ms = start.elapsed().as_millis(),
        "Tree build completed"
    );

    Ok(tree)
}

/// Build the tree for `leaves` and return only its root digest
pub fn build_root<S: AsRef<str>>(leaves: &[S]) -> Result<HexDigest, EngineError> {
    let tree = build(leaves, None)?;
    Ok(tree.root_digest().to_string())
}

fn emit_pairing(
    sink: &mut dyn TraceSink,
    arena: &Arena,
    left: NodeHandle,
    right: NodeHandle,
    parent: NodeHandle,
) -> Result<(), EngineError> {
    let (left, right, parent) = (arena.get(left), arena.get(right), arena.get(parent));

    sink.record(TraceRecord::Left {
        content: left.content().to_string(),
        digest: left.digest().to_string(),
    })
    .map_err(EngineError::Trace)?;
    sink.record(TraceRecord::Right {
        content: right.content().to_string(),
        digest: right.digest().to_string(),
    })
    .map_err(EngineError::Trace)?;
    sink.record(TraceRecord::Parent {
        left_content: left.content().to_string(),
        right_content: right.content().to_string(),
        content: parent.content().to_string(),
        digest: parent.digest().to_string(),
    })
    .map_err(EngineError::Trace)
}
