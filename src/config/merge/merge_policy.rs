//! Merge rules: defaults, override order, conflict handling.

use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("system.store_path", ".modelseal/store")?
        .set_default("system.trace_dir", ".modelseal/traces")?
        .set_default("system.keep_traces", true)?
        .set_default("extraction.fallback_encoding", "utf-8")?
        .set_default("registry.discard_on_mismatch", true)
}
