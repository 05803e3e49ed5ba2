//! Persistence layer for the Fingerprint Store

use crate::error::StorageError;
use crate::store::{FingerprintRecord, FingerprintStore};
use std::path::Path;
use tracing::debug;

const RECORD_PREFIX: &[u8] = b"record:";

/// Sled-based implementation of FingerprintStore
pub struct SledFingerprintStore {
    db: sled::Db,
}

impl SledFingerprintStore {
    /// Open (or create) a store at the given directory
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let db = sled::open(path).map_err(|e| storage_io("Failed to open sled database", e))?;
        Ok(Self { db })
    }

    /// Check if a record exists for (name, version)
    pub fn contains(&self, name: &str, version: &str) -> Result<bool, StorageError> {
        self.db
            .contains_key(record_key(name, version))
            .map_err(|e| storage_io("Failed to check record existence", e))
    }

    /// Flush all pending writes to disk
    pub fn flush(&self) -> Result<(), StorageError> {
        self.db
            .flush()
            .map_err(|e| storage_io("Failed to flush database", e))?;
        Ok(())
    }
}

impl FingerprintStore for SledFingerprintStore {
    fn get(&self, name: &str, version: &str) -> Result<Option<FingerprintRecord>, StorageError> {
        match self
            .db
            .get(record_key(name, version))
            .map_err(|e| storage_io("Failed to get fingerprint record", e))?
        {
            Some(value) => Ok(Some(decode_record(&value)?)),
            None => Ok(None),
        }
    }

    fn insert(&self, record: &FingerprintRecord) -> Result<(), StorageError> {
        let key = record_key(&record.name, &record.version);
        let value = bincode::serialize(record)
            .map_err(|e| storage_invalid("Failed to serialize fingerprint record", e))?;

        let swapped = self
            .db
            .compare_and_swap(key, None as Option<&[u8]>, Some(value))
            .map_err(|e| storage_io("Failed to put fingerprint record", e))?;

        if swapped.is_err() {
            return Err(StorageError::DuplicateRecord {
                name: record.name.clone(),
                version: record.version.clone(),
            });
        }

        debug!(name = %record.name, version = %record.version, "Stored fingerprint record");
        Ok(())
    }

    fn update(&self, record: &FingerprintRecord) -> Result<(), StorageError> {
        let key = record_key(&record.name, &record.version);
        let current = self
            .db
            .get(&key)
            .map_err(|e| storage_io("Failed to get fingerprint record", e))?
            .ok_or_else(|| StorageError::RecordNotFound {
                name: record.name.clone(),
                version: record.version.clone(),
            })?;
        let value = bincode::serialize(record)
            .map_err(|e| storage_invalid("Failed to serialize fingerprint record", e))?;

        let swapped = self
            .db
            .compare_and_swap(key, Some(current), Some(value))
            .map_err(|e| storage_io("Failed to update fingerprint record", e))?;

        if let Err(e) = swapped {
            return Err(storage_io("Fingerprint record changed concurrently", e));
        }

        debug!(name = %record.name, version = %record.version, "Updated fingerprint record");
        Ok(())
    }

    fn remove(&self, name: &str, version: &str) -> Result<bool, StorageError> {
        let removed = self
            .db
            .remove(record_key(name, version))
            .map_err(|e| storage_io("Failed to remove fingerprint record", e))?;
        Ok(removed.is_some())
    }

    fn list(&self) -> Result<Vec<FingerprintRecord>, StorageError> {
        let mut records = Vec::new();
        for item in self.db.scan_prefix(RECORD_PREFIX) {
            let (_, value) = item.map_err(|e| storage_io("Failed to iterate store", e))?;
            records.push(decode_record(&value)?);
        }
        Ok(records)
    }
}

/// `record:<name>\0<version>`; sled orders keys bytewise, so listing comes back
/// sorted by name then version
fn record_key(name: &str, version: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(RECORD_PREFIX.len() + name.len() + 1 + version.len());
    key.extend_from_slice(RECORD_PREFIX);
    key.extend_from_slice(name.as_bytes());
    key.push(0);
    key.extend_from_slice(version.as_bytes());
    key
}

fn decode_record(bytes: &[u8]) -> Result<FingerprintRecord, StorageError> {
    bincode::deserialize(bytes)
        .map_err(|e| storage_invalid("Failed to deserialize fingerprint record", e))
}

fn storage_io(context: &str, err: impl std::fmt::Display) -> StorageError {
    StorageError::IoError(std::io::Error::new(
        std::io::ErrorKind::Other,
        format!("{}: {}", context, err),
    ))
}

fn storage_invalid(context: &str, err: impl std::fmt::Display) -> StorageError {
    StorageError::IoError(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        format!("{}: {}", context, err),
    ))
}
