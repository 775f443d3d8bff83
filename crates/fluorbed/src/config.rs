//! Engine configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults (`SimConfig::default()`)
//! 2. `fluorbed.ron` in the working directory, or an explicit `--config` file
//! 3. Environment variables prefixed with `FLUORBED_`
//!
//! Example environment variable: `FLUORBED_FINANCE__CAPEX=2000000`

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use fluorbed_core::SimConfig;
use std::path::Path;

/// Default file name looked up when no explicit path is given
pub const DEFAULT_CONFIG_NAME: &str = "fluorbed";
pub const ENV_PREFIX: &str = "FLUORBED";

/// Load and validate the engine configuration
///
/// A missing default file is fine; a missing explicit file is an error.
pub fn load(explicit: Option<&Path>) -> Result<SimConfig> {
    let defaults =
        Config::try_from(&SimConfig::default()).context("Failed to encode default configuration")?;

    let file = match explicit {
        Some(path) => File::from(path).format(FileFormat::Ron).required(true),
        None => File::with_name(DEFAULT_CONFIG_NAME)
            .format(FileFormat::Ron)
            .required(false),
    };

    let builder = Config::builder()
        // Layer 1: Compiled defaults
        .add_source(defaults)
        // Layer 2: Config file
        .add_source(file)
        // Layer 3: Environment variables (FLUORBED_FINANCE__CAPEX, etc.)
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

    let config: SimConfig = builder
        .build()
        .context("Failed to build configuration")?
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    config.validate().context("Configuration rejected")?;
    log::debug!("Loaded configuration: {:?}", config);
    Ok(config)
}
