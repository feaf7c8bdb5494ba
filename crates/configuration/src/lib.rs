use crate::error::ConfigError;
use crate::settings::Config;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    AnalysisConfig, BottleneckScreen, ClientPolicy, InputSettings, LoggingConfig, OrderPolicy,
    RiskCurve, ShiftSettings,
};

/// Name of the config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "order-insight";

/// Prefix for environment overrides. The prefix and every nesting level are
/// joined with `__`, e.g. `ORDER_INSIGHT__ANALYSIS__SHIFT__CAPACITY_HR=600`.
pub const ENV_PREFIX: &str = "ORDER_INSIGHT";

/// Loads and validates the application configuration.
///
/// With `path = None` the optional `order-insight.toml` in the working directory
/// is read if present; an explicit path must exist. Environment variables are
/// layered on top, and missing values fall back to the built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file = match path {
        Some(p) => config::File::from(p).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}
