//! Trace codec: human-readable audit log of tree hashing steps
//!
//! Line format, one record per line:
//!
//! ```text
//! Left child: <content> | Hash: <digest>
//! Right child: <content> | Hash: <digest>
//! Parent (concatenation of <left> and <right>): <content> | Hash: <digest>
//! ```
//!
//! Parsing is positional and lossy. Lines whose content contains spaces do not
//! line up with the fixed field positions and are skipped. The parsed index is
//! an audit aid and never feeds proof verification.

use crate::error::EngineError;
use crate::tree::node::Tree;
use crate::types::{is_hex_digest, HexDigest, HEX_DIGEST_LEN};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// A single hashing step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceRecord {
    Left {
        content: String,
        digest: HexDigest,
    },
    Right {
        content: String,
        digest: HexDigest,
    },
    Parent {
        left_content: String,
        right_content: String,
        content: String,
        digest: HexDigest,
    },
}

impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceRecord::Left { content, digest } => {
                write!(f, "Left child: {} | Hash: {}", content, digest)
            }
            TraceRecord::Right { content, digest } => {
                write!(f, "Right child: {} | Hash: {}", content, digest)
            }
            TraceRecord::Parent {
                left_content,
                right_content,
                content,
                digest,
            } => write!(
                f,
                "Parent (concatenation of {} and {}): {} | Hash: {}",
                left_content, right_content, content, digest
            ),
        }
    }
}

/// Destination for trace records
pub trait TraceSink {
    fn record(&mut self, record: TraceRecord) -> io::Result<()>;
}

impl TraceSink for Vec<TraceRecord> {
    fn record(&mut self, record: TraceRecord) -> io::Result<()> {
        self.push(record);
        Ok(())
    }
}

/// Writes trace records in the line format
pub struct TraceWriter<W: Write> {
    inner: W,
    lines: usize,
}

impl<W: Write> TraceWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, lines: 0 }
    }

    /// Number of records written so far
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Flush and return the underlying writer
    pub fn finish(mut self) -> io::Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> TraceSink for TraceWriter<W> {
    fn record(&mut self, record: TraceRecord) -> io::Result<()> {
        writeln!(self.inner, "{}", record)?;
        self.lines += 1;
        Ok(())
    }
}

/// Create (or truncate) a trace file at `path`
pub fn create_trace_file(path: &Path) -> Result<TraceWriter<BufWriter<File>>, EngineError> {
    let file = File::create(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(TraceWriter::new(BufWriter::new(file)))
}

/// Emit one `Parent` record per internal node, depth-first in pre-order.
///
/// Leaves produce no record. Walks with an explicit stack so deep trees do
/// not grow the call stack.
pub fn write_trace(tree: &Tree, sink: &mut dyn TraceSink) -> Result<(), EngineError> {
    let mut stack = vec![tree.root_handle()];
    while let Some(handle) = stack.pop() {
        let node = tree.node(handle);
        if let Some((left, right)) = node.children() {
            let (left_node, right_node) = (tree.node(left), tree.node(right));
            sink.record(TraceRecord::Parent {
                left_content: left_node.content().to_string(),
                right_content: right_node.content().to_string(),
                content: node.content().to_string(),
                digest: node.digest().to_string(),
            })
            .map_err(EngineError::Trace)?;
            stack.push(right);
            stack.push(left);
        }
    }
    Ok(())
}

/// Lookup from node content to digest, recovered from a trace log
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TraceIndex {
    entries: BTreeMap<String, HexDigest>,
}

impl TraceIndex {
    pub fn get(&self, content: &str) -> Option<&str> {
        self.entries.get(content).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Follow `leaf` up through the logged parents.
    ///
    /// Starts with the leaf's own digest, then repeatedly picks the parent
    /// whose content begins or ends with the current digest. The last entry
    /// is the highest ancestor the log knows about. Empty if the leaf is not
    /// in the index.
    pub fn audit_trail(&self, leaf: &str) -> Vec<HexDigest> {
        let mut trail = Vec::new();
        let Some(mut current) = self.entries.get(leaf).cloned() else {
            return trail;
        };

        while trail.len() <= self.entries.len() {
            trail.push(current.clone());
            let parent = self.entries.iter().find(|(content, _)| {
                content.len() == 2 * HEX_DIGEST_LEN
                    && (content.starts_with(current.as_str()) || content.ends_with(current.as_str()))
            });
            match parent {
                Some((_, digest)) => current = digest.clone(),
                None => break,
            }
        }
        trail
    }

    fn insert(&mut self, content: &str, digest: &str) {
        self.entries.insert(content.to_string(), digest.to_string());
    }
}

/// Parse a trace log into a `TraceIndex`.
///
/// Lines that do not match the writer's field layout are skipped.
pub fn parse_trace<R: BufRead>(reader: R) -> io::Result<TraceIndex> {
    let mut index = TraceIndex::default();
    let mut skipped = 0usize;

    for line in reader.lines() {
        let line = line?;
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        match parse_line(line) {
            Some((content, digest)) => index.insert(content, digest),
            None => skipped += 1,
        }
    }

    debug!(entries = index.len(), skipped, "Parsed trace");
    Ok(index)
}

/// Parse the trace file at `path`
pub fn parse_trace_file(path: &Path) -> Result<TraceIndex, EngineError> {
    let file = File::open(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_trace(BufReader::new(file)).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_line(line: &str) -> Option<(&str, &str)> {
    let fields: Vec<&str> = line.split(' ').collect();
    let (content_at, marker_at) = match fields.as_slice() {
        ["Left" | "Right", "child:", ..] if fields.len() == 6 => (2, 4),
        ["Parent", "(concatenation", "of", ..] if fields.len() == 10 => (6, 8),
        _ => return None,
    };

    if fields[marker_at - 1] != "|" || fields[marker_at] != "Hash:" {
        return None;
    }
    let digest = fields[marker_at + 1];
    if !is_hex_digest(digest) {
        return None;
    }
    Some((fields[content_at], digest))
}
