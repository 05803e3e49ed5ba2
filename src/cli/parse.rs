//! CLI parse: clap types for modelseal. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// modelseal - Merkle fingerprints for model artifacts
#[derive(Parser)]
#[command(name = "modelseal")]
#[command(about = "Fingerprint, verify and prove the content of model artifacts with hash trees")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the hash tree of an artifact and print its root
    Build {
        /// Artifact file
        file: PathBuf,
        /// Write the build trace to this path
        #[arg(long)]
        trace: Option<PathBuf>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Check an artifact against an expected root
    Verify {
        /// Artifact file
        file: PathBuf,
        /// Expected root digest (64 hex characters)
        root: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print an inclusion proof for one leaf as JSON
    Prove {
        /// Artifact file
        file: PathBuf,
        /// Leaf content to prove
        leaf: String,
        /// Prove the leaf at this position instead of its first occurrence
        #[arg(long)]
        index: Option<usize>,
    },
    /// Check an inclusion proof against a root
    CheckInclusion {
        /// Leaf content
        leaf: String,
        /// Proof file produced by `prove`
        proof: PathBuf,
        /// Expected root digest
        root: String,
    },
    /// Check whether a newer artifact extends an older one
    Consistency {
        /// Earlier artifact
        old: PathBuf,
        /// Later artifact
        new: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Write the depth-first trace of an artifact's tree
    Trace {
        /// Artifact file
        file: PathBuf,
        /// Trace output path
        out: PathBuf,
    },
    /// Follow a leaf up through a trace file
    Audit {
        /// Trace file
        trace_file: PathBuf,
        /// Leaf content
        leaf: String,
    },
    /// Record the fingerprint of an artifact version
    Register {
        /// Artifact name
        name: String,
        /// Artifact version
        version: String,
        /// Artifact file
        file: PathBuf,
        /// Free-form description
        #[arg(long)]
        description: Option<String>,
        /// Reported evaluation accuracy
        #[arg(long)]
        accuracy: Option<f64>,
        /// What changed in this version
        #[arg(long)]
        change_log: Option<String>,
    },
    /// Mark a registered artifact version as deprecated
    Deprecate {
        /// Artifact name
        name: String,
        /// Artifact version
        version: String,
    },
    /// Verify a copy of a registered artifact version
    Check {
        /// Artifact name
        name: String,
        /// Artifact version
        version: String,
        /// Copy to verify
        file: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List registered artifact versions
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the effective configuration as TOML
    Config,
}
