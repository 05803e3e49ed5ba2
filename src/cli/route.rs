//! CLI route: single route table and run context. Dispatches to engine, registry and presentation.

use crate::cli::help::command_name;
use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_audit_trail_text, format_build_text, format_check_text, format_consistency_text,
    format_json, format_record_list_text, format_registration_text, format_verify_text,
};
use crate::config::{ConfigLoader, SealConfig};
use crate::error::{ApiError, EngineError};
use crate::proof::{check_consistency, check_inclusion, prove_inclusion, prove_inclusion_at, InclusionProof};
use crate::registry::{ArtifactRegistry, RecordMetadata};
use crate::tree::builder::build;
use crate::tree::leaves::LeafExtractor;
use crate::tree::trace::{create_trace_file, parse_trace_file, write_trace};
use crate::verify::Verifier;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info_span};

/// Runtime context for CLI execution: workspace, loaded config and extraction settings.
/// Built from workspace path and optional config path using ConfigLoader only.
pub struct RunContext {
    workspace_root: PathBuf,
    config: SealConfig,
    extractor: LeafExtractor,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        Self::with_config(workspace_root, config)
    }

    /// Create run context from an already loaded configuration
    pub fn with_config(workspace_root: PathBuf, config: SealConfig) -> Result<Self, ApiError> {
        config.ensure_valid()?;
        let extractor = config.extraction.extractor()?;
        Ok(Self {
            workspace_root,
            config,
            extractor,
        })
    }

    pub fn config(&self) -> &SealConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let span = info_span!("command", name = command_name(command));
        let _guard = span.enter();
        let started = Instant::now();
        let result = self.execute_inner(command);
        debug!(
            ok = result.is_ok(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Build {
                file,
                trace,
                format,
            } => self.handle_build(file, trace.as_deref(), format),
            Commands::Verify { file, root, format } => self.handle_verify(file, root, format),
            Commands::Prove { file, leaf, index } => self.handle_prove(file, leaf, *index),
            Commands::CheckInclusion { leaf, proof, root } => {
                self.handle_check_inclusion(leaf, proof, root)
            }
            Commands::Consistency { old, new, format } => {
                self.handle_consistency(old, new, format)
            }
            Commands::Trace { file, out } => self.handle_trace(file, out),
            Commands::Audit { trace_file, leaf } => self.handle_audit(trace_file, leaf),
            Commands::Register {
                name,
                version,
                file,
                description,
                accuracy,
                change_log,
            } => {
                let metadata = RecordMetadata {
                    description: description.clone(),
                    accuracy: *accuracy,
                    change_log: change_log.clone(),
                };
                let registration = self.registry()?.register(name, version, file, &metadata)?;
                Ok(format_registration_text(&registration))
            }
            Commands::Deprecate { name, version } => {
                let record = self.registry()?.deprecate(name, version)?;
                Ok(format!("deprecated {} version {}", record.name, record.version))
            }
            Commands::Check {
                name,
                version,
                file,
                format,
            } => {
                let json_output = is_json(format)?;
                let outcome = self.registry()?.check(name, version, file)?;
                if json_output {
                    format_json(&outcome)
                } else {
                    Ok(format_check_text(&outcome))
                }
            }
            Commands::List { format } => {
                let json_output = is_json(format)?;
                let records = self.registry()?.list()?;
                if json_output {
                    format_json(&records)
                } else {
                    Ok(format_record_list_text(&records))
                }
            }
            Commands::Config => toml::to_string_pretty(&self.config)
                .map_err(|e| ApiError::ConfigError(format!("Failed to render config: {}", e))),
        }
    }

    fn registry(&self) -> Result<ArtifactRegistry, ApiError> {
        ArtifactRegistry::from_config(&self.config, &self.workspace_root)
    }

    fn handle_build(&self, file: &Path, trace: Option<&Path>, format: &str) -> Result<String, ApiError> {
        let json_output = is_json(format)?;
        let leaves = self.extractor.extract(file)?;
        let tree = match trace {
            Some(trace_path) => {
                let mut writer = create_trace_file(trace_path)?;
                let tree = build(&leaves, Some(&mut writer))?;
                writer.finish().map_err(EngineError::Trace)?;
                tree
            }
            None => build(&leaves, None)?,
        };

        if json_output {
            format_json(&json!({
                "root": tree.root_digest(),
                "leaf_count": tree.leaf_count(),
                "node_count": tree.node_count(),
                "trace": trace,
            }))
        } else {
            Ok(format_build_text(&tree, trace))
        }
    }

    fn handle_verify(&self, file: &Path, root: &str, format: &str) -> Result<String, ApiError> {
        let json_output = is_json(format)?;
        let report = Verifier::new(self.extractor).verify_report(file, root)?;
        if json_output {
            format_json(&report)
        } else {
            Ok(format_verify_text(&report))
        }
    }

    fn handle_prove(&self, file: &Path, leaf: &str, index: Option<usize>) -> Result<String, ApiError> {
        let leaves = self.extractor.extract(file)?;
        let proof = match index {
            Some(index) => {
                if leaves.get(index).map(String::as_str) != Some(leaf) {
                    return Err(ApiError::InvalidInput(format!(
                        "leaf at index {} is not {:?}",
                        index, leaf
                    )));
                }
                prove_inclusion_at(index, &leaves)
            }
            None => prove_inclusion(leaf, &leaves),
        };
        let proof = proof.ok_or_else(|| {
            ApiError::InvalidInput(format!("leaf {:?} does not occur in {}", leaf, file.display()))
        })?;
        format_json(&proof)
    }

    fn handle_check_inclusion(&self, leaf: &str, proof_path: &Path, root: &str) -> Result<String, ApiError> {
        let bytes = std::fs::read(proof_path).map_err(|source| EngineError::Io {
            path: proof_path.to_path_buf(),
            source,
        })?;
        let proof: InclusionProof = serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::InvalidInput(format!("Malformed proof file: {}", e)))?;
        let included = check_inclusion(leaf, &proof, root);
        Ok(if included { "included" } else { "not included" }.to_string())
    }

    fn handle_consistency(&self, old: &Path, new: &Path, format: &str) -> Result<String, ApiError> {
        let json_output = is_json(format)?;
        let earlier = self.extractor.extract(old)?;
        let later = self.extractor.extract(new)?;
        let outcome = check_consistency(&earlier, &later);
        if json_output {
            format_json(&outcome)
        } else {
            Ok(format_consistency_text(&outcome))
        }
    }

    fn handle_trace(&self, file: &Path, out: &Path) -> Result<String, ApiError> {
        let leaves = self.extractor.extract(file)?;
        let tree = build(&leaves, None)?;
        let mut writer = create_trace_file(out)?;
        write_trace(&tree, &mut writer)?;
        let lines = writer.lines();
        writer.finish().map_err(EngineError::Trace)?;
        Ok(format!("wrote {} parent records to {}", lines, out.display()))
    }

    fn handle_audit(&self, trace_file: &Path, leaf: &str) -> Result<String, ApiError> {
        let index = parse_trace_file(trace_file)?;
        let trail = index.audit_trail(leaf);
        Ok(format_audit_trail_text(leaf, &trail))
    }
}

fn is_json(format: &str) -> Result<bool, ApiError> {
    match format {
        "json" => Ok(true),
        "text" => Ok(false),
        other => Err(ApiError::InvalidInput(format!(
            "Invalid format: {} (must be 'text' or 'json')",
            other
        ))),
    }
}
