//! Configuration validation and error reporting

use std::collections::BTreeSet;

use anyhow::bail;

use super::types::Config;
use crate::store::StoreSpec;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(config: &Config) -> anyhow::Result<()> {
        if config.spaces.is_empty() {
            bail!(
                "No spaces configured. Provide at least one space with --spaces or in a config \
                 file, formatted as [name:]space-id:access-token"
            );
        }

        let mut names = BTreeSet::new();
        for space in &config.spaces {
            let spec = StoreSpec::parse(space)?;
            if !names.insert(spec.name.clone()) {
                bail!("Space name '{}' is used more than once", spec.name);
            }
        }

        if config.proxy_host.is_some() != config.proxy_port.is_some() {
            bail!("--proxy-host and --proxy-port must be both defined");
        }

        if let Some(environment) = &config.environment
            && environment.trim().is_empty()
        {
            bail!("Environment cannot be empty");
        }

        if let Some(host) = &config.host
            && host.trim().is_empty()
        {
            bail!("Host cannot be empty");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        Config {
            spaces: vec!["blog:abc123:token".to_string()],
            ..Config::default()
        }
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(ConfigValidator::validate(&valid()).is_ok());
    }

    #[test]
    fn test_validate_requires_spaces() {
        let result = ConfigValidator::validate(&Config::default());
        assert!(result.unwrap_err().to_string().contains("No spaces configured"));
    }

    #[test]
    fn test_validate_malformed_space() {
        let mut config = valid();
        config.spaces.push("not a space".to_string());

        let result = ConfigValidator::validate(&config);
        assert!(result.unwrap_err().to_string().contains("invalid space"));
    }

    #[test]
    fn test_validate_duplicate_names() {
        let mut config = valid();
        config.spaces.push("blog:def456:token".to_string());

        let result = ConfigValidator::validate(&config);
        assert!(result.unwrap_err().to_string().contains("used more than once"));
    }

    #[test]
    fn test_validate_proxy_needs_both_parts() {
        let mut config = valid();
        config.proxy_host = Some("proxy".to_string());

        let result = ConfigValidator::validate(&config);
        assert!(result.unwrap_err().to_string().contains("must be both defined"));

        config.proxy_port = Some(3128);
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_validate_empty_environment() {
        let mut config = valid();
        config.environment = Some("  ".to_string());
        assert!(ConfigValidator::validate(&config).is_err());
    }
}
