//! # DEX Client Configuration
//!
//! Centralized constants and configuration loading for the DEX client
//! workspace, so program names, fees and endpoints are defined once.
//!
//! ## Features
//!
//! - **Defaults**: fee constants, program ids, mapping names, API endpoint
//! - **Configuration**: TOML file with environment overlay and `DEX_` env overrides
//!
//! ## Usage
//!
//! ```rust
//! use dex_config::{defaults, DexConfig};
//!
//! let swap_fee = defaults::fees::SWAP;
//! let config = DexConfig::default();
//! assert_eq!(config.fees.swap, swap_fee);
//! ```

pub mod defaults;
pub mod dex_config;

// Re-export commonly used types
pub use dex_config::{
    load_config, ClientSettings, DexConfig, FeeSettings, NetworkSettings, ProgramSettings,
};
