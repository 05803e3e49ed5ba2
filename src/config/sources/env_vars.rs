//! Environment source: MODELSEAL__SECTION__KEY=value

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

/// Add the environment override source. Highest precedence.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("MODELSEAL")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    )
}
