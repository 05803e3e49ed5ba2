//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{ApiError, EngineError, StorageError};

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::EngineError(EngineError::EmptyInput) => {
            "error: artifact contains no leaves".to_string()
        }
        ApiError::StorageError(StorageError::RecordNotFound { name, version }) => {
            format!("error: {} version {} is not registered", name, version)
        }
        ApiError::StorageError(StorageError::DuplicateRecord { name, version }) => {
            format!("error: {} version {} is already registered", name, version)
        }
        other => format!("error: {}", other),
    }
}
