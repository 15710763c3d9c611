use crate::config::types::Config;
use crate::config::validation::validate;
use crate::crawler::PageTarget;
use crate::url::{parse_base_url, resolve_url};
use crate::{ConfigError, ConfigResult};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use catalog_harvest::config::load_config;
///
/// let config = load_config(Path::new("harvest.toml")).unwrap();
/// println!("Output directory: {}", config.output.directory);
/// ```
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    // Parse TOML
    let config: Config = toml::from_str(&content)?;

    // Validate the configuration
    validate(&config)?;

    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so output files can be traced back to the table that
/// produced them.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> ConfigResult<String> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> ConfigResult<(Config, String)> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

/// Resolves the configured target table into absolute page targets
///
/// Relative target URLs are joined against `base-url`. Order is preserved:
/// it is the order output files are written in.
pub fn resolve_targets(config: &Config) -> ConfigResult<Vec<PageTarget>> {
    let base = config
        .base_url
        .as_deref()
        .map(parse_base_url)
        .transpose()
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    config
        .targets
        .iter()
        .map(|entry| {
            let url = resolve_url(base.as_ref(), &entry.url).map_err(|e| {
                ConfigError::InvalidUrl(format!(
                    "Invalid URL for target '{}': {}",
                    entry.destination, e
                ))
            })?;
            Ok(PageTarget {
                destination: entry.destination.clone(),
                url,
            })
        })
        .collect()
}
