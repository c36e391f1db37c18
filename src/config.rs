//! Configuration management for UtxoChain

use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub chain: ChainConfig,
    #[serde(default)]
    pub mempool: MempoolConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChainConfig {
    /// Height-levels of history kept before the oldest branches are pruned.
    #[serde(default = "default_retention_window")]
    pub retention_window: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            retention_window: default_retention_window(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct MempoolConfig {
    #[serde(default = "default_max_transactions")]
    pub max_transactions: usize,
}

impl Default for MempoolConfig {
    fn default() -> Self {
        Self {
            max_transactions: default_max_transactions(),
        }
    }
}

fn default_retention_window() -> u64 {
    10
}

fn default_max_transactions() -> usize {
    10_000
}

/// Load configuration for an embedding host from an optional `config.toml`
/// in the working directory, falling back to defaults when it is absent.
pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    let config_str = fs::read_to_string("config.toml").unwrap_or_default();
    let config: Config = if config_str.is_empty() {
        // Sane defaults when config.toml is absent
        Config::default()
    } else {
        toml::from_str(&config_str)?
    };

    // Validate critical values
    if config.chain.retention_window == 0 {
        return Err("chain.retention_window must be at least 1".into());
    }

    if config.mempool.max_transactions == 0 {
        return Err("mempool.max_transactions must be at least 1".into());
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.chain.retention_window, 10);
        assert_eq!(config.mempool.max_transactions, 10_000);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str("[chain]\nretention_window = 3\n").unwrap();
        assert_eq!(config.chain.retention_window, 3);
        assert_eq!(config.mempool.max_transactions, 10_000);
    }

    #[test]
    fn test_load_config_falls_back_to_defaults() {
        // No config.toml in the test working directory.
        let config = load_config().unwrap();
        assert_eq!(config.chain.retention_window, 10);
        assert_eq!(config.mempool.max_transactions, 10_000);
    }
}
