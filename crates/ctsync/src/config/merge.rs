//! Configuration merging with precedence rules
//!
//! # Merging Semantics
//!
//! - **`spaces`**: Additive - spaces from all configs are combined, duplicates dropped
//! - **Optional values**: The highest-precedence config that sets a value wins
//! - **Booleans**: OR semantics - if any config sets to `true`, result is `true`

use std::fs;
use std::path::Path;

use anyhow::Context;

use super::discovery::ConfigFiles;
use super::types::Config;

/// Configuration merger
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge multiple config files with precedence rules
    ///
    /// Precedence order (highest to lowest):
    /// 1. CLI config
    /// 2. .ctsync.local
    /// 3. .ctsync
    /// 4. Global config
    ///
    /// # Errors
    ///
    /// Returns an error if config files cannot be read or parsed.
    pub fn merge(files: &ConfigFiles) -> anyhow::Result<Config> {
        let mut merged = Config::default();

        // Lowest precedence first so later files override
        for path in [&files.global, &files.project, &files.local, &files.cli]
            .into_iter()
            .flatten()
        {
            Self::merge_file(&mut merged, path)?;
        }

        Ok(merged)
    }

    /// Load and merge a single config file into the existing config
    fn merge_file(base: &mut Config, path: &Path) -> anyhow::Result<()> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Self::merge_config(base, config);
        Ok(())
    }

    /// Merge `other` over `base`; `other` has the higher precedence
    pub fn merge_config(base: &mut Config, other: Config) {
        for space in other.spaces {
            if !base.spaces.contains(&space) {
                base.spaces.push(space);
            }
        }

        if other.environment.is_some() {
            base.environment = other.environment;
        }
        if other.host.is_some() {
            base.host = other.host;
        }
        if other.port.is_some() {
            base.port = other.port;
        }
        if other.proxy_host.is_some() {
            base.proxy_host = other.proxy_host;
        }
        if other.proxy_port.is_some() {
            base.proxy_port = other.proxy_port;
        }
        if other.pre_publish_delay_ms.is_some() {
            base.pre_publish_delay_ms = other.pre_publish_delay_ms;
        }

        base.insecure |= other.insecure;
        base.non_interactive |= other.non_interactive;
        base.dry_run |= other.dry_run;
    }
}
