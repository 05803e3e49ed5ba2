//! Configuration System
//!
//! Layered configuration: built-in defaults, the global config file, workspace
//! config files and `MODELSEAL__`-prefixed environment variables, in increasing
//! priority. Validation collects every problem instead of stopping at the first.

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::tree::leaves::LeafExtractor;
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SealConfig {
    /// Storage locations
    #[serde(default)]
    pub system: SystemConfig,

    /// Artifact decoding and size limits
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Registry behavior
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Storage locations, relative paths resolve against the workspace root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Fingerprint store directory
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// Directory for build traces written on register
    #[serde(default = "default_trace_dir")]
    pub trace_dir: PathBuf,

    /// Write a trace file for every registered artifact
    #[serde(default = "default_true")]
    pub keep_traces: bool,
}

fn default_store_path() -> PathBuf {
    PathBuf::from(".modelseal/store")
}

fn default_trace_dir() -> PathBuf {
    PathBuf::from(".modelseal/traces")
}

fn default_true() -> bool {
    true
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            trace_dir: default_trace_dir(),
            keep_traces: default_true(),
        }
    }
}

impl SystemConfig {
    /// Validate system configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.store_path.as_os_str().is_empty() {
            return Err("Store path cannot be empty".to_string());
        }
        if self.trace_dir.as_os_str().is_empty() {
            return Err("Trace directory cannot be empty".to_string());
        }
        Ok(())
    }

    pub fn store_path_in(&self, workspace_root: &Path) -> PathBuf {
        resolve_path(workspace_root, &self.store_path)
    }

    pub fn trace_dir_in(&self, workspace_root: &Path) -> PathBuf {
        resolve_path(workspace_root, &self.trace_dir)
    }
}

/// How artifact bytes are turned into text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// WHATWG encoding label used when the detected encoding fails
    #[serde(default = "default_fallback_encoding")]
    pub fallback_encoding: String,

    /// Largest artifact accepted, in bytes; unlimited when unset
    #[serde(default)]
    pub max_artifact_bytes: Option<u64>,
}

fn default_fallback_encoding() -> String {
    "utf-8".to_string()
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            fallback_encoding: default_fallback_encoding(),
            max_artifact_bytes: None,
        }
    }
}

impl ExtractionConfig {
    pub fn validate(&self) -> Result<(), String> {
        if Encoding::for_label(self.fallback_encoding.as_bytes()).is_none() {
            return Err(format!("Unknown fallback encoding '{}'", self.fallback_encoding));
        }
        if self.max_artifact_bytes == Some(0) {
            return Err("max_artifact_bytes must be greater than zero".to_string());
        }
        Ok(())
    }

    /// Build the leaf extractor these settings describe
    pub fn extractor(&self) -> Result<LeafExtractor, ApiError> {
        let fallback = Encoding::for_label(self.fallback_encoding.as_bytes()).ok_or_else(|| {
            ApiError::ConfigError(format!("Unknown fallback encoding '{}'", self.fallback_encoding))
        })?;
        Ok(LeafExtractor::new()
            .with_fallback(fallback)
            .with_max_bytes(self.max_artifact_bytes))
    }
}

/// Registry behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Delete a local artifact copy that fails verification
    #[serde(default = "default_true")]
    pub discard_on_mismatch: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            discard_on_mismatch: default_true(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    System(String),
    Extraction(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::System(msg) => write!(f, "System: {}", msg),
            ValidationError::Extraction(msg) => write!(f, "Extraction: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl SealConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.system.validate() {
            errors.push(ValidationError::System(e));
        }

        if let Err(e) = self.extraction.validate() {
            errors.push(ValidationError::Extraction(e));
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            errors.push(ValidationError::Logging(format!(
                "Invalid log format '{}'",
                self.logging.format
            )));
        }
        if !matches!(self.logging.output.as_str(), "stdout" | "stderr" | "file") {
            errors.push(ValidationError::Logging(format!(
                "Invalid log output '{}'",
                self.logging.output
            )));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate, folding all errors into a single `ApiError`
    pub fn ensure_valid(&self) -> Result<(), ApiError> {
        self.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })
    }
}

fn resolve_path(workspace_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        workspace_root.join(path)
    }
}
