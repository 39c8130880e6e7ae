//! Common types and utilities for command execution

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use anyhow::{Context, bail};
use ctsync::Selector;
use ctsync::config::{Config, ConfigManager};
use ctsync::store;
use ctsync::sync::{SyncEngine, SyncReport, SyncReporter};
use tracing::debug;

use crate::cli::ConnectionArgs;

/// Execution options shared by every command
pub struct SyncOptions<'a> {
    /// Preview changes without applying (dry-run)
    pub dry_run: bool,
    /// Overwrite conflicting fields without prompting
    pub yes_all: bool,
    /// Path to custom config file
    pub config_path: Option<&'a Path>,
    /// Skip loading all config files
    pub no_config: bool,
    /// Connection flags given on the command line
    pub connection: &'a ConnectionArgs,
    /// Raised by the Ctrl+C handler
    pub interrupted: Arc<AtomicBool>,
}

impl<'a> SyncOptions<'a> {
    /// Create new sync options
    #[must_use]
    #[allow(clippy::fn_params_excessive_bools)]
    pub fn new(
        dry_run: bool,
        yes_all: bool,
        config_path: Option<&'a Path>,
        no_config: bool,
        connection: &'a ConnectionArgs,
        interrupted: Arc<AtomicBool>,
    ) -> Self {
        Self {
            dry_run,
            yes_all,
            config_path,
            no_config,
            connection,
            interrupted,
        }
    }

    /// Command line flags as a config layer above every file
    fn overrides(&self) -> Config {
        let connection = self.connection;
        Config {
            spaces: connection.spaces.clone(),
            environment: connection.environment.clone(),
            host: connection.host.clone(),
            port: connection.port,
            insecure: connection.insecure,
            proxy_host: connection.proxy_host.clone(),
            proxy_port: connection.proxy_port,
            pre_publish_delay_ms: connection.pre_publish_delay,
            non_interactive: self.yes_all,
            dry_run: self.dry_run,
        }
    }
}

/// Validated configuration plus the store names selectors resolve against
pub struct Session {
    pub config: Config,
    store_names: Vec<String>,
    interrupted: Arc<AtomicBool>,
}

impl Session {
    /// Load, merge, and validate the configuration
    pub fn open(options: &SyncOptions<'_>) -> anyhow::Result<Self> {
        let config = ConfigManager::load(options.config_path, options.no_config)
            .context("Failed to load configuration")?;
        let config = ConfigManager::finalize(config, options.overrides())?;
        let store_names = config.store_names()?;

        debug!("Configured stores: {}", store_names.join(", "));

        Ok(Self {
            config,
            store_names,
            interrupted: Arc::clone(&options.interrupted),
        })
    }

    /// Parse one selector against the configured stores
    pub fn selector(&self, input: &str) -> anyhow::Result<Selector> {
        Ok(Selector::parse(input, &self.store_names)?)
    }

    /// Parse selectors against the configured stores
    pub fn selectors(&self, inputs: &[String]) -> anyhow::Result<Vec<Selector>> {
        Ok(Selector::parse_all(inputs, &self.store_names)?)
    }

    /// Connect to every configured space
    pub fn engine(&self) -> anyhow::Result<SyncEngine> {
        let specs = self.config.store_specs()?;
        let stores = store::connect_contentful(&specs, &self.config.contentful_settings())
            .context("Failed to connect to spaces")?;

        Ok(SyncEngine::new(stores)?
            .with_dry_run(self.config.dry_run)
            .with_pre_publish_delay(self.config.pre_publish_delay())
            .with_interrupt_flag(Arc::clone(&self.interrupted)))
    }
}

/// Print the summary; any failed target makes the command fail
pub fn finish(report: &SyncReport) -> anyhow::Result<()> {
    let summary = SyncReporter::generate_summary(report);
    println!("{summary}");

    if !report.is_success() {
        bail!(
            "{} of {} target(s) could not be updated",
            report.failed(),
            report.targets.len()
        );
    }

    Ok(())
}
