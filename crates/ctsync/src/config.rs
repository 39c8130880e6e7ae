//! Configuration file parsing, merging, and validation
//!
//! This module handles:
//! - Config file discovery from multiple locations
//! - TOML parsing with serde
//! - Config merging with precedence rules
//! - Validation of spaces and connection settings

mod discovery;
mod merge;
mod types;
mod validation;


pub use discovery::{ConfigDiscovery, ConfigFiles};
pub use merge::ConfigMerger;
pub use types::{Config, DEFAULT_PRE_PUBLISH_DELAY_MS};
pub use validation::ConfigValidator;

/// Configuration manager that coordinates discovery, parsing, merging, and validation
pub struct ConfigManager;

impl ConfigManager {
    /// Load and merge configuration from all discovered files
    ///
    /// With `no_config` set no file is read and the defaults are returned.
    /// The result is not validated yet since command line flags may still
    /// add spaces; call [`ConfigManager::finalize`] once they are applied.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file cannot be read or parsed.
    pub fn load(cli_config_path: Option<&std::path::Path>, no_config: bool) -> anyhow::Result<Config> {
        if no_config {
            return Ok(Config::default());
        }

        let config_files = ConfigDiscovery::discover(cli_config_path)?;
        ConfigMerger::merge(&config_files)
    }

    /// Apply command line overrides and validate the result
    ///
    /// # Errors
    ///
    /// Returns an error if the merged configuration is invalid.
    pub fn finalize(mut config: Config, overrides: Config) -> anyhow::Result<Config> {
        ConfigMerger::merge_config(&mut config, overrides);
        ConfigValidator::validate(&config)?;
        Ok(config)
    }
}
