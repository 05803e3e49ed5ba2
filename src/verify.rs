//! Integrity verification of artifacts against a recorded fingerprint

use crate::error::EngineError;
use crate::tree::builder::build;
use crate::tree::leaves::LeafExtractor;
use crate::types::HexDigest;
use serde::Serialize;
use std::path::Path;
use subtle::ConstantTimeEq;
use tracing::{info, instrument, warn};

/// Outcome of verifying one artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    pub expected_root: HexDigest,
    pub actual_root: HexDigest,
    pub leaf_count: usize,
    pub matches: bool,
}

/// Rebuilds an artifact's tree and compares its root to a stored fingerprint
#[derive(Debug, Clone, Copy, Default)]
pub struct Verifier {
    extractor: LeafExtractor,
}

impl Verifier {
    pub fn new(extractor: LeafExtractor) -> Self {
        Self { extractor }
    }

    /// Returns whether the artifact at `path` still hashes to `expected_root`.
    ///
    /// A mismatch is `Ok(false)`. Only read and decoding failures are errors.
    pub fn verify(&self, path: &Path, expected_root: &str) -> Result<bool, EngineError> {
        Ok(self.verify_report(path, expected_root)?.matches)
    }

    #[instrument(skip(self, expected_root), fields(path = %path.display()))]
    pub fn verify_report(&self, path: &Path, expected_root: &str) -> Result<VerifyReport, EngineError> {
        let leaves = self.extractor.extract(path)?;
        let tree = build(&leaves, None)?;
        let actual_root = tree.root_digest();
        let matches = digests_equal(actual_root, expected_root);

        if matches {
            info!(root = %actual_root, "Artifact verified");
        } else {
            warn!(
                expected = %expected_root,
                actual = %actual_root,
                "Artifact fingerprint mismatch"
            );
        }

        Ok(VerifyReport {
            expected_root: expected_root.to_string(),
            actual_root: actual_root.to_string(),
            leaf_count: tree.leaf_count(),
            matches,
        })
    }
}

/// Verify the artifact at `path` with default extraction settings
pub fn verify(path: &Path, expected_root: &str) -> Result<bool, EngineError> {
    Verifier::default().verify(path, expected_root)
}

/// Exact, case-sensitive comparison that inspects every byte of equal-length input
fn digests_equal(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
