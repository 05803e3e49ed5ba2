//! Leaf extraction: artifact bytes to an ordered leaf sequence
//!
//! The file is decoded as text (byte-order mark first, statistical detection
//! otherwise), trimmed, and split on commas. Empty pieces are kept as leaves
//! so fingerprints stay stable for artifacts with consecutive or trailing
//! commas.

use crate::error::EngineError;
use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use std::path::Path;
use tracing::{debug, instrument, warn};

/// Leaf delimiter
pub const LEAF_SEPARATOR: char = ',';

/// Reads artifacts and turns them into leaf sequences
#[derive(Debug, Clone, Copy)]
pub struct LeafExtractor {
    fallback: &'static Encoding,
    max_bytes: Option<u64>,
}

impl Default for LeafExtractor {
    fn default() -> Self {
        Self {
            fallback: UTF_8,
            max_bytes: None,
        }
    }
}

impl LeafExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encoding used when decoding under the detected encoding fails.
    ///
    /// UTF-8 drops invalid sequences; any other encoding decodes strictly.
    pub fn with_fallback(mut self, encoding: &'static Encoding) -> Self {
        self.fallback = encoding;
        self
    }

    /// Refuse artifacts larger than `limit` bytes before reading them
    pub fn with_max_bytes(mut self, limit: Option<u64>) -> Self {
        self.max_bytes = limit;
        self
    }

    pub fn fallback(&self) -> &'static Encoding {
        self.fallback
    }

    pub fn max_bytes(&self) -> Option<u64> {
        self.max_bytes
    }

    /// Read, decode and chunk the artifact at `path`
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn extract(&self, path: &Path) -> Result<Vec<String>, EngineError> {
        let bytes = self.read(path)?;
        let text = self.decode(path, &bytes)?;
        let leaves = split_leaves(&text);
        debug!(leaf_count = leaves.len(), "Extracted leaves");
        Ok(leaves)
    }

    /// Decode raw artifact bytes to text
    pub fn decode(&self, path: &Path, bytes: &[u8]) -> Result<String, EngineError> {
        let (encoding, body) = match Encoding::for_bom(bytes) {
            Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
            None => (detect_encoding(bytes), bytes),
        };
        debug!(encoding = encoding.name(), "Detected encoding");
        self.decode_as(path, encoding, body, bytes)
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, EngineError> {
        let io_err = |source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(limit) = self.max_bytes {
            let size = std::fs::metadata(path).map_err(io_err)?.len();
            if size > limit {
                return Err(EngineError::TooLarge {
                    path: path.to_path_buf(),
                    size,
                    limit,
                });
            }
        }

        std::fs::read(path).map_err(io_err)
    }

    fn decode_as(
        &self,
        path: &Path,
        detected: &'static Encoding,
        body: &[u8],
        raw: &[u8],
    ) -> Result<String, EngineError> {
        if let Some(text) = detected.decode_without_bom_handling_and_without_replacement(body) {
            return Ok(text.into_owned());
        }

        warn!(
            detected = detected.name(),
            fallback = self.fallback.name(),
            "Failed to decode with detected encoding, retrying with fallback"
        );

        if self.fallback == UTF_8 {
            return Ok(decode_utf8_lossy_dropping(raw));
        }

        self.fallback
            .decode_without_bom_handling_and_without_replacement(raw)
            .map(|text| text.into_owned())
            .ok_or_else(|| EngineError::Decoding {
                path: path.to_path_buf(),
                encoding: format!("{} (fallback after {})", self.fallback.name(), detected.name()),
            })
    }
}

/// Extract leaves from `path` with default settings
pub fn extract_leaves(path: &Path) -> Result<Vec<String>, EngineError> {
    LeafExtractor::default().extract(path)
}

/// Trim surrounding whitespace and split on the leaf separator
pub fn split_leaves(text: &str) -> Vec<String> {
    text.trim().split(LEAF_SEPARATOR).map(str::to_string).collect()
}

/// Statistical guess over the whole buffer
fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

/// UTF-8 decode that drops invalid sequences instead of replacing them
fn decode_utf8_lossy_dropping(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}
