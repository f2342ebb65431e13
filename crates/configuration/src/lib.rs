
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use logging::init_logging;
pub use settings::{
    AllocationSettings, Config, ComparisonSettings, DataSettings, LoggingSettings, MetricsSettings,
    WindowSettings,
};

/// The file `load_config` reads when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Loads the application configuration from the `config.toml` file.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(Path::new(DEFAULT_CONFIG_FILE))
}

/// Loads the configuration from `path`, layered with `FUNDLENS__*` environment variables.
///
/// The file is optional: every section has a default, so the tool runs with
/// no configuration at all. Environment variables use `__` as the section
/// separator, e.g. `FUNDLENS__ALLOCATION__BUDGET=500000`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("FUNDLENS")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}
