use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    ColumnLayout, Config, CostModelConfig, Delimiter, IngestionConfig, InstrumentFee,
    LoggingConfig, PlanTable, PlanTier, RiskPolicy, ServerConfig,
};

/// Prefix of the environment variables that override file settings,
/// e.g. `ANALYST__SERVER__PORT=8080`.
const ENV_PREFIX: &str = "ANALYST";

/// Loads the application configuration from the `config.toml` file.
///
/// The file is optional; environment variables are layered on top of it and
/// anything left unset keeps its default.
pub fn load_config() -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name("config.toml").required(false));
    build(builder)
}

/// Loads the application configuration from an explicit file, which must exist.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder().add_source(config::File::from(path));
    build(builder)
}

fn build(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<Config, ConfigError> {
    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = settings.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}
