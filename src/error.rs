//! Error types for the modelseal integrity engine and registry.

use std::path::PathBuf;
use thiserror::Error;

/// Engine-related errors
///
/// Digest mismatches and failed proofs are not represented here; they are
/// ordinary `false`/`None` results of the engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Cannot build a tree from an empty leaf sequence")]
    EmptyInput,

    #[error("Failed to read artifact {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode artifact {path:?} as {encoding}")]
    Decoding { path: PathBuf, encoding: String },

    #[error("Artifact {path:?} is {size} bytes, exceeding the {limit} byte limit")]
    TooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("Failed to write trace: {0}")]
    Trace(#[source] std::io::Error),
}

/// Storage-related errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("No fingerprint recorded for {name} version {version}")]
    RecordNotFound { name: String, version: String },

    #[error("A fingerprint is already recorded for {name} version {version}")]
    DuplicateRecord { name: String, version: String },

    #[error("Invalid fingerprint: {0}")]
    InvalidFingerprint(String),

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Registry and CLI errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Engine error: {0}")]
    EngineError(#[from] EngineError),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid artifact name: {0:?}")]
    InvalidArtifactName(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
