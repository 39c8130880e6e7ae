//! Configuration types and structures

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::store::{ContentfulSettings, StoreSpec};

/// Pause between save and publish used when nothing else is configured
pub const DEFAULT_PRE_PUBLISH_DELAY_MS: u64 = 5000;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Spaces to operate on, formatted as `[name:]space-id:access-token`
    #[serde(default)]
    pub spaces: Vec<String>,

    /// Environment within each space (default `master`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,

    /// Management API host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Management API port
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Use http instead of https
    #[serde(default)]
    pub insecure: bool,

    /// Proxy hostname; requires `proxy_port`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_host: Option<String>,

    /// Proxy port; requires `proxy_host`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_port: Option<u16>,

    /// Milliseconds to wait between save and publish
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_publish_delay_ms: Option<u64>,

    /// Never prompt; conflicting fields are overwritten
    #[serde(default)]
    pub non_interactive: bool,

    /// Compute changes without saving or publishing
    #[serde(default)]
    pub dry_run: bool,
}

impl Config {
    /// Parse every configured space
    ///
    /// # Errors
    ///
    /// Returns an error for the first malformed space.
    pub fn store_specs(&self) -> Result<Vec<StoreSpec>> {
        self.spaces.iter().map(|space| StoreSpec::parse(space)).collect()
    }

    /// Store names in configuration order
    ///
    /// # Errors
    ///
    /// Returns an error for the first malformed space.
    pub fn store_names(&self) -> Result<Vec<String>> {
        Ok(self.store_specs()?.into_iter().map(|spec| spec.name).collect())
    }

    /// Connection settings for the Contentful connector
    #[must_use]
    pub fn contentful_settings(&self) -> ContentfulSettings {
        let defaults = ContentfulSettings::default();
        ContentfulSettings {
            environment: self.environment.clone().unwrap_or(defaults.environment),
            host: self.host.clone().unwrap_or(defaults.host),
            port: self.port,
            insecure: self.insecure,
            proxy: self.proxy_host.clone().zip(self.proxy_port),
            timeout: defaults.timeout,
        }
    }

    /// Pause between save and publish
    #[must_use]
    pub fn pre_publish_delay(&self) -> Duration {
        Duration::from_millis(self.pre_publish_delay_ms.unwrap_or(DEFAULT_PRE_PUBLISH_DELAY_MS))
    }
}
