//! Configuration file discovery from multiple locations

use std::path::{Path, PathBuf};

use anyhow::bail;

/// Configuration file locations in order of precedence
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigFiles {
    /// Config from CLI flag (highest precedence)
    pub cli: Option<PathBuf>,
    /// Project-local config (.ctsync.local)
    pub local: Option<PathBuf>,
    /// Project config (.ctsync)
    pub project: Option<PathBuf>,
    /// Global XDG config
    pub global: Option<PathBuf>,
}

/// Config file discovery
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Discover all available configuration files
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly requested config file does not exist.
    pub fn discover(cli_path: Option<&Path>) -> anyhow::Result<ConfigFiles> {
        let cli = match cli_path {
            Some(path) if path.is_file() => Some(path.to_path_buf()),
            Some(path) => bail!("Config file not found: {}", path.display()),
            None => None,
        };

        Ok(ConfigFiles {
            cli,
            local: Self::find_file(".ctsync.local"),
            project: Self::find_file(".ctsync"),
            global: Self::find_global_config(),
        })
    }

    /// Find a config file in the current directory or parent directories
    fn find_file(name: &str) -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            let candidate = current.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Find global config in XDG config directory
    fn find_global_config() -> Option<PathBuf> {
        let global_config = dirs::config_dir()?.join("ctsync").join("config.toml");
        global_config.is_file().then_some(global_config)
    }
}
