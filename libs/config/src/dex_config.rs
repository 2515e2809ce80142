//! DEX Client Configuration Module
//!
//! Provides configuration loading for the DEX client. Supports loading from
//! TOML files with environment-specific overrides and `DEX_` environment
//! variables (`DEX_NETWORK__ENDPOINT`, `DEX_FEES__SWAP`, ...).

use crate::defaults;
use anyhow::{Context, Result};
use config_crate::{Config, Environment, File};
use dex_types::{Address, ProgramId, WalletChain};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default location of the base configuration file
const DEFAULT_CONFIG_PATH: &str = "config/dex.toml";

/// Main client configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct DexConfig {
    /// Network API and wallet chain
    pub network: NetworkSettings,

    /// Program identifiers
    pub programs: ProgramSettings,

    /// Transaction fees in microcredits
    pub fees: FeeSettings,

    /// Client behaviour
    pub client: ClientSettings,
}

/// Network API settings
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct NetworkSettings {
    pub endpoint: String,
    pub network: String,
    pub chain: WalletChain,
    pub request_timeout_ms: u64,
}

/// Deployed programs
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ProgramSettings {
    pub dex: ProgramId,
    pub dex_address: Address,
    pub token_registry: ProgramId,
    pub credits: ProgramId,
}

/// Fees per transaction kind
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct FeeSettings {
    pub approve: u64,
    pub transfer: u64,
    pub swap: u64,
    pub liquidity: u64,
}

/// Client behaviour settings
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct ClientSettings {
    pub debounce_ms: u64,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            endpoint: defaults::network::ENDPOINT.to_string(),
            network: defaults::network::NETWORK.to_string(),
            chain: WalletChain::TestnetBeta,
            request_timeout_ms: defaults::network::REQUEST_TIMEOUT_MS,
        }
    }
}

impl NetworkSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for ProgramSettings {
    fn default() -> Self {
        Self {
            dex: ProgramId::from_static(defaults::programs::DEX),
            dex_address: Address::from_static(defaults::programs::DEX_ADDRESS),
            token_registry: ProgramId::from_static(defaults::programs::TOKEN_REGISTRY),
            credits: ProgramId::from_static(defaults::programs::CREDITS),
        }
    }
}

impl Default for FeeSettings {
    fn default() -> Self {
        Self {
            approve: defaults::fees::APPROVE,
            transfer: defaults::fees::TRANSFER,
            swap: defaults::fees::SWAP,
            liquidity: defaults::fees::LIQUIDITY,
        }
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            debounce_ms: defaults::client::DEBOUNCE_MS,
        }
    }
}

impl ClientSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl DexConfig {
    /// Load configuration from files with environment overrides
    ///
    /// An explicitly given `base_path` must exist; the default path is optional
    /// and built-in defaults apply when it is missing.
    pub fn load(base_path: Option<&Path>, environment: Option<&str>) -> Result<Self> {
        let base = base_path.unwrap_or(Path::new(DEFAULT_CONFIG_PATH));

        let mut builder =
            Config::builder().add_source(File::from(base).required(base_path.is_some()));

        // Add environment-specific overrides if specified
        if let Some(env) = environment {
            let env_file = PathBuf::from("config/environments").join(format!("{}.toml", env));

            if env_file.exists() {
                info!("Loading environment config: {:?}", env_file);
                builder = builder.add_source(File::from(env_file));
            } else {
                warn!("Environment config not found: {:?}", env_file);
            }
        }

        // Override with environment variables (DEX_ prefix, __ between levels)
        builder = builder.add_source(
            Environment::with_prefix("DEX")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        let config: Self = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Expand environment variables in the endpoint
    pub fn expand_env_vars(&mut self) -> Result<()> {
        let expanded =
            shellexpand::env(&self.network.endpoint).context("Failed to expand endpoint")?;
        self.network.endpoint = expanded.trim_end_matches('/').to_string();
        Ok(())
    }

    /// Render the effective configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

/// Convenience function to load configuration with defaults
pub fn load_config(path: Option<&Path>, environment: Option<&str>) -> Result<DexConfig> {
    let mut config = DexConfig::load(path, environment)?;
    config.expand_env_vars()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_match_constants() {
        let config = DexConfig::default();
        assert_eq!(config.fees.approve, 35_000);
        assert_eq!(config.fees.swap, 500_000);
        assert_eq!(config.fees.liquidity, 750_000);
        assert_eq!(config.programs.dex.as_str(), "test_swap_15.aleo");
        assert_eq!(config.client.debounce(), Duration::from_secs(1));
    }

    #[test]
    fn test_default_constants_are_valid_identifiers() {
        assert!(defaults::programs::DEX.parse::<ProgramId>().is_ok());
        assert!(defaults::programs::TOKEN_REGISTRY.parse::<ProgramId>().is_ok());
        assert!(defaults::programs::CREDITS.parse::<ProgramId>().is_ok());
        assert!(defaults::programs::DEX_ADDRESS.parse::<Address>().is_ok());
    }

    #[test]
    fn test_load_partial_config() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("dex.toml");

        let config_content = r#"
[network]
endpoint = "http://localhost:3030/"
chain = "mainnetbeta"

[programs]
dex = "my_dex_v2.aleo"

[fees]
swap = 600000
"#;

        fs::write(&config_path, config_content).unwrap();

        let config = load_config(Some(&config_path), None).unwrap();

        assert_eq!(config.network.endpoint, "http://localhost:3030");
        assert_eq!(config.network.chain, WalletChain::MainnetBeta);
        assert_eq!(config.network.network, "testnet");
        assert_eq!(config.programs.dex.as_str(), "my_dex_v2.aleo");
        assert_eq!(config.programs.credits.as_str(), "credits.aleo");
        assert_eq!(config.fees.swap, 600_000);
        assert_eq!(config.fees.approve, 35_000);
    }

    #[test]
    fn test_invalid_program_id_is_rejected() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("dex.toml");
        fs::write(&config_path, "[programs]\ndex = \"NotAProgram\"\n").unwrap();

        assert!(DexConfig::load(Some(&config_path), None).is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(DexConfig::load(Some(&dir.path().join("absent.toml")), None).is_err());
    }

    #[test]
    fn test_renders_toml() {
        let rendered = DexConfig::default().to_toml_string().unwrap();
        assert!(rendered.contains("[fees]"));
        assert!(rendered.contains("swap = 500000"));
    }
}
