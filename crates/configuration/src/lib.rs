use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, Market, OutputFormat, Quote, Report, SeedTrade};

/// Loads the application configuration from the `config.toml` file.
///
/// This function is the primary entry point for this crate. It reads the configuration file,
/// deserializes it into our strongly-typed `Config` struct, validates it and returns it.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(Path::new("config.toml"))
}

/// Loads and validates the configuration at `path`.
///
/// Values can be overridden from the environment with the `GBCE_` prefix and
/// `__` between sections, e.g. `GBCE_MARKET__WINDOW_SECS=600`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(
            config::Environment::with_prefix("GBCE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(
        "Configuration loaded from {}: {} stocks, {} quotes, {} seed trades",
        path.display(),
        config.stocks.len(),
        config.quotes.len(),
        config.trades.len()
    );
    Ok(config)
}

/// Parses and validates a configuration held in a TOML string.
pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    let config = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?
        .try_deserialize::<Config>()?;

    config.validate()?;
    Ok(config)
}
