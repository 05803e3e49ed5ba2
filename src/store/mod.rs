//! Fingerprint Store
//!
//! Durable (name, version) -> fingerprint records. The engine only produces
//! and consumes the fingerprint string; everything else on a record is
//! registry bookkeeping.

pub mod persistence;

pub use persistence::SledFingerprintStore;

use crate::error::StorageError;
use crate::types::Fingerprint;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Recorded fingerprint of one artifact version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FingerprintRecord {
    pub name: String,
    pub version: String,
    pub fingerprint: Fingerprint,
    pub description: Option<String>,
    /// Reported evaluation accuracy
    pub accuracy: Option<f64>,
    pub change_log: Option<String>,
    pub deprecated: bool,
    pub leaf_count: usize,
    pub recorded_at: DateTime<Utc>,
}

/// FingerprintStore interface
///
/// Records are unique per (name, version); `insert` never overwrites.
pub trait FingerprintStore {
    fn get(&self, name: &str, version: &str) -> Result<Option<FingerprintRecord>, StorageError>;
    fn insert(&self, record: &FingerprintRecord) -> Result<(), StorageError>;

    /// Replace the metadata of an existing record; a missing record is an error
    fn update(&self, record: &FingerprintRecord) -> Result<(), StorageError>;
    fn remove(&self, name: &str, version: &str) -> Result<bool, StorageError>;

    /// All records, ordered by name then version
    fn list(&self) -> Result<Vec<FingerprintRecord>, StorageError>;

    /// Like `get`, but a missing record is an error
    fn require(&self, name: &str, version: &str) -> Result<FingerprintRecord, StorageError> {
        self.get(name, version)?
            .ok_or_else(|| StorageError::RecordNotFound {
                name: name.to_string(),
                version: version.to_string(),
            })
    }
}
