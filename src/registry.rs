//! Artifact Registry
//!
//! Local counterpart of a model registry: fingerprints an artifact when it is
//! registered, stores the root per (name, version), and re-verifies a copy
//! before it is released.

use crate::config::SealConfig;
use crate::error::{ApiError, EngineError, StorageError};
use crate::store::{FingerprintRecord, FingerprintStore, SledFingerprintStore};
use crate::tree::builder::build;
use crate::tree::leaves::LeafExtractor;
use crate::tree::node::Tree;
use crate::tree::trace::create_trace_file;
use crate::types::Fingerprint;
use crate::verify::{Verifier, VerifyReport};
use chrono::Utc;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// Result of registering one artifact version
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub record: FingerprintRecord,
    /// Build trace, when traces are kept
    pub trace_path: Option<PathBuf>,
}

/// Result of checking a copy against its recorded fingerprint
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub name: String,
    pub version: String,
    pub report: VerifyReport,
    /// The mismatching copy was deleted
    pub discarded: bool,
}

impl CheckOutcome {
    pub fn is_verified(&self) -> bool {
        self.report.matches
    }
}

/// Caller-supplied metadata stored alongside a fingerprint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordMetadata {
    pub description: Option<String>,
    pub accuracy: Option<f64>,
    pub change_log: Option<String>,
}

impl RecordMetadata {
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = Some(accuracy);
        self
    }

    pub fn with_change_log(mut self, change_log: impl Into<String>) -> Self {
        self.change_log = Some(change_log.into());
        self
    }

    fn validate(&self) -> Result<(), ApiError> {
        match self.accuracy {
            Some(accuracy) if !accuracy.is_finite() => Err(ApiError::InvalidInput(format!(
                "accuracy must be a finite number, got {}",
                accuracy
            ))),
            _ => Ok(()),
        }
    }
}

pub struct ArtifactRegistry {
    store: Box<dyn FingerprintStore>,
    extractor: LeafExtractor,
    trace_dir: Option<PathBuf>,
    discard_on_mismatch: bool,
}

impl ArtifactRegistry {
    pub fn new(store: Box<dyn FingerprintStore>, extractor: LeafExtractor) -> Self {
        Self {
            store,
            extractor,
            trace_dir: None,
            discard_on_mismatch: false,
        }
    }

    /// Write a build trace per registration into `dir`
    pub fn with_trace_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.trace_dir = dir;
        self
    }

    /// Delete a checked copy whose fingerprint does not match
    pub fn with_discard_on_mismatch(mut self, discard: bool) -> Self {
        self.discard_on_mismatch = discard;
        self
    }

    /// Open the sled store and apply the registry settings from `config`
    pub fn from_config(config: &SealConfig, workspace_root: &Path) -> Result<Self, ApiError> {
        let store = SledFingerprintStore::new(config.system.store_path_in(workspace_root))?;
        let trace_dir = config
            .system
            .keep_traces
            .then(|| config.system.trace_dir_in(workspace_root));

        Ok(Self::new(Box::new(store), config.extraction.extractor()?)
            .with_trace_dir(trace_dir)
            .with_discard_on_mismatch(config.registry.discard_on_mismatch))
    }

    /// Fingerprint the artifact at `path` and record it under (name, version).
    ///
    /// An existing record for the same version is never replaced, and neither
    /// is its trace: the new trace is staged next to the final name and only
    /// moved into place once the record is stored.
    #[instrument(skip(self, path, metadata), fields(path = %path.display()))]
    pub fn register(
        &self,
        name: &str,
        version: &str,
        path: &Path,
        metadata: &RecordMetadata,
    ) -> Result<Registration, ApiError> {
        let name = sanitize_name(name)?;
        validate_version(version)?;
        metadata.validate()?;

        if self.store.get(&name, version)?.is_some() {
            return Err(StorageError::DuplicateRecord {
                name,
                version: version.to_string(),
            }
            .into());
        }

        let leaves = self.extractor.extract(path)?;

        let (tree, staged) = match &self.trace_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir).map_err(|source| EngineError::Io {
                    path: dir.clone(),
                    source,
                })?;
                let trace_path = dir.join(trace_file_name(&name, version));
                let staging_path = staging_path(&trace_path);
                let tree = match write_traced(&leaves, &staging_path) {
                    Ok(tree) => tree,
                    Err(e) => {
                        discard_staged(&staging_path);
                        return Err(e.into());
                    }
                };
                (tree, Some((staging_path, trace_path)))
            }
            None => (build(&leaves, None)?, None),
        };

        let stored = Fingerprint::try_from(tree.root_digest().to_string())
            .map_err(ApiError::from)
            .and_then(|fingerprint| {
                let record = FingerprintRecord {
                    name,
                    version: version.to_string(),
                    fingerprint,
                    description: non_blank(metadata.description.as_deref()),
                    accuracy: metadata.accuracy,
                    change_log: non_blank(metadata.change_log.as_deref()),
                    deprecated: false,
                    leaf_count: tree.leaf_count(),
                    recorded_at: Utc::now(),
                };
                self.store.insert(&record)?;
                Ok(record)
            });
        let record = match stored {
            Ok(record) => record,
            Err(e) => {
                if let Some((staging_path, _)) = &staged {
                    discard_staged(staging_path);
                }
                return Err(e);
            }
        };

        let trace_path = match staged {
            Some((staging_path, trace_path)) => {
                if let Err(source) = std::fs::rename(&staging_path, &trace_path) {
                    discard_staged(&staging_path);
                    self.store.remove(&record.name, &record.version)?;
                    return Err(EngineError::Io {
                        path: trace_path,
                        source,
                    }
                    .into());
                }
                Some(trace_path)
            }
            None => None,
        };

        info!(
            name = %record.name,
            version = %record.version,
            fingerprint = %record.fingerprint,
            "Artifact registered"
        );
        Ok(Registration { record, trace_path })
    }

    /// Mark (name, version) as deprecated. The fingerprint is unchanged and the
    /// version can still be checked.
    #[instrument(skip(self))]
    pub fn deprecate(&self, name: &str, version: &str) -> Result<FingerprintRecord, ApiError> {
        let name = sanitize_name(name)?;
        let mut record = self.store.require(&name, version)?;
        if !record.deprecated {
            record.deprecated = true;
            self.store.update(&record)?;
            info!(name = %record.name, version = %record.version, "Artifact deprecated");
        }
        Ok(record)
    }

    /// Verify a copy of (name, version) at `path` against the recorded fingerprint
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub fn check(&self, name: &str, version: &str, path: &Path) -> Result<CheckOutcome, ApiError> {
        let name = sanitize_name(name)?;
        let record = self.store.require(&name, version)?;

        let report = Verifier::new(self.extractor).verify_report(path, record.fingerprint.as_str())?;

        let mut discarded = false;
        if !report.matches && self.discard_on_mismatch {
            std::fs::remove_file(path).map_err(|source| EngineError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            warn!(path = %path.display(), "Discarded corrupted copy");
            discarded = true;
        }

        Ok(CheckOutcome {
            name,
            version: version.to_string(),
            report,
            discarded,
        })
    }

    pub fn get(&self, name: &str, version: &str) -> Result<FingerprintRecord, ApiError> {
        let name = sanitize_name(name)?;
        Ok(self.store.require(&name, version)?)
    }

    pub fn list(&self) -> Result<Vec<FingerprintRecord>, ApiError> {
        Ok(self.store.list()?)
    }
}

/// Reduce an artifact name to a filesystem-safe form.
///
/// Whitespace becomes `_`, anything outside `[A-Za-z0-9._-]` is dropped and
/// leading or trailing `.`/`_` are stripped. A name with nothing left is
/// rejected.
pub fn sanitize_name(name: &str) -> Result<String, ApiError> {
    let mapped: String = name
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();

    let trimmed = mapped.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        return Err(ApiError::InvalidArtifactName(name.to_string()));
    }
    Ok(trimmed.to_string())
}

fn validate_version(version: &str) -> Result<(), ApiError> {
    if version.trim().is_empty() {
        return Err(ApiError::InvalidInput("version must not be empty".to_string()));
    }
    if version.contains(['/', '\\', '\0']) || version == "." || version == ".." {
        return Err(ApiError::InvalidInput(format!(
            "version {:?} contains path characters",
            version
        )));
    }
    Ok(())
}

fn trace_file_name(name: &str, version: &str) -> String {
    format!("{}_v{}_merkle.tree", name, version)
}

/// Unique sibling of `trace_path` that a failed registration can drop
fn staging_path(trace_path: &Path) -> PathBuf {
    let stamp = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let mut name = trace_path.as_os_str().to_os_string();
    name.push(format!(".{}-{}.partial", std::process::id(), stamp));
    PathBuf::from(name)
}

fn write_traced(leaves: &[String], staging_path: &Path) -> Result<Tree, EngineError> {
    let mut writer = create_trace_file(staging_path)?;
    let tree = build(leaves, Some(&mut writer))?;
    writer.finish().map_err(EngineError::Trace)?;
    Ok(tree)
}

fn discard_staged(staging_path: &Path) {
    if let Err(e) = std::fs::remove_file(staging_path) {
        warn!(path = %staging_path.display(), error = %e, "Failed to remove staged trace");
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}
