//! # Application Configuration
//!
//! This module manages configuration loaded from environment variables (and an
//! optional `.env` file). All configuration is validated on startup to fail fast
//! if misconfigured.
//!
//! ## Global Config Access
//!
//! Use [`core_config()`] to access the global configuration instance:
//!
//! ```rust,no_run
//! use lib_core::config::core_config;
//!
//! let config = core_config();
//! let interval = config.poll_interval_secs;
//! ```
//!
//! The config must be initialized once at application startup using [`init_config()`].

use crate::error::{AppError, Result};
use lib_utils::envs::{get_env_opt, get_env_or, get_env_parse_or};
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

pub const DEFAULT_MARKET_API_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_EXPLORER_API_URL: &str = "https://api-sepolia.etherscan.io/api";
pub const DEFAULT_EXPLORER_ADDRESS: &str = "0xA9A9F177d1085AeD15E92Dad3Deb1252E46DF46D";
pub const DEFAULT_STATE_FILE: &str = "data/xcrypt-state.json";

/// Application configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct Config {
    /// Wallet provider JSON-RPC endpoint. `None` means no provider is installed.
    pub rpc_url: Option<String>,

    /// Address of the deployed transactions contract.
    pub contract_address: Option<String>,

    /// Base URL of the market data API (CoinGecko-compatible).
    pub market_api_url: String,

    /// Seconds between market polls.
    ///
    /// Valid range: 5-3600
    pub poll_interval_secs: u64,

    /// Block explorer API endpoint (Etherscan-compatible).
    pub explorer_api_url: String,

    pub explorer_api_key: Option<String>,

    /// Account whose explorer history is previewed.
    pub explorer_address: String,

    /// Durable key/value file (holds `transactionCount`).
    pub state_file: PathBuf,

    /// Timeout applied to every HTTP and RPC request.
    ///
    /// Valid range: 1-120
    pub http_timeout_secs: u64,

    /// Receipt polling period while a submission awaits confirmation.
    pub confirmation_poll_ms: u64,

    /// Upper bound on a confirmation wait.
    pub confirmation_timeout_secs: u64,

    /// Identity provider API key. `None` disables sign-in.
    pub auth_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: None,
            contract_address: None,
            market_api_url: DEFAULT_MARKET_API_URL.to_string(),
            poll_interval_secs: 30,
            explorer_api_url: DEFAULT_EXPLORER_API_URL.to_string(),
            explorer_api_key: None,
            explorer_address: DEFAULT_EXPLORER_ADDRESS.to_string(),
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            http_timeout_secs: 10,
            confirmation_poll_ms: 1000,
            confirmation_timeout_secs: 600,
            auth_api_key: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let env_err = |e: lib_utils::envs::Error| AppError::Config(e.to_string());

        Ok(Self {
            rpc_url: get_env_opt("XCRYPT_RPC_URL"),
            contract_address: get_env_opt("XCRYPT_CONTRACT_ADDRESS"),
            market_api_url: get_env_or("XCRYPT_MARKET_API_URL", &defaults.market_api_url),
            poll_interval_secs: get_env_parse_or("XCRYPT_POLL_INTERVAL_SECS", defaults.poll_interval_secs)
                .map_err(env_err)?,
            explorer_api_url: get_env_or("XCRYPT_EXPLORER_API_URL", &defaults.explorer_api_url),
            explorer_api_key: get_env_opt("XCRYPT_EXPLORER_API_KEY"),
            explorer_address: get_env_or("XCRYPT_EXPLORER_ADDRESS", &defaults.explorer_address),
            state_file: get_env_opt("XCRYPT_STATE_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.state_file),
            http_timeout_secs: get_env_parse_or("XCRYPT_HTTP_TIMEOUT_SECS", defaults.http_timeout_secs)
                .map_err(env_err)?,
            confirmation_poll_ms: get_env_parse_or("XCRYPT_CONFIRMATION_POLL_MS", defaults.confirmation_poll_ms)
                .map_err(env_err)?,
            confirmation_timeout_secs: get_env_parse_or(
                "XCRYPT_CONFIRMATION_TIMEOUT_SECS",
                defaults.confirmation_timeout_secs,
            )
            .map_err(env_err)?,
            auth_api_key: get_env_opt("XCRYPT_AUTH_API_KEY"),
        })
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if !(5..=3600).contains(&self.poll_interval_secs) {
            return Err(AppError::Config(
                "XCRYPT_POLL_INTERVAL_SECS must be between 5 and 3600".to_string(),
            ));
        }

        if !(1..=120).contains(&self.http_timeout_secs) {
            return Err(AppError::Config(
                "XCRYPT_HTTP_TIMEOUT_SECS must be between 1 and 120".to_string(),
            ));
        }

        if self.confirmation_poll_ms == 0 {
            return Err(AppError::Config(
                "XCRYPT_CONFIRMATION_POLL_MS must be greater than 0".to_string(),
            ));
        }

        if let Some(address) = &self.contract_address {
            lib_utils::validate_hex_address(address)
                .map_err(|e| AppError::Config(format!("XCRYPT_CONTRACT_ADDRESS: {e}")))?;
        }

        lib_utils::validate_hex_address(&self.explorer_address)
            .map_err(|e| AppError::Config(format!("XCRYPT_EXPLORER_ADDRESS: {e}")))?;

        for (name, url) in [
            ("XCRYPT_MARKET_API_URL", Some(&self.market_api_url)),
            ("XCRYPT_EXPLORER_API_URL", Some(&self.explorer_api_url)),
            ("XCRYPT_RPC_URL", self.rpc_url.as_ref()),
        ] {
            if let Some(url) = url {
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(AppError::Config(format!("{name} must be an http(s) URL")));
                }
            }
        }

        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn confirmation_poll(&self) -> Duration {
        Duration::from_millis(self.confirmation_poll_ms)
    }

    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_secs)
    }
}

/// Global configuration instance (initialized once at startup).
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Initialize the global configuration from the environment.
///
/// Loads `.env` if present, then reads, validates and installs the config.
///
/// # Errors
///
/// Returns an error if:
/// - Environment variables are malformed
/// - Configuration validation fails
/// - Config has already been initialized
pub fn init_config() -> Result<&'static Config> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    config.validate()?;

    CONFIG
        .set(config)
        .map_err(|_| AppError::Config("Config has already been initialized".to_string()))?;

    Ok(core_config())
}

/// Get a reference to the global configuration.
///
/// # Panics
///
/// Panics if [`init_config()`] has not been called yet.
pub fn core_config() -> &'static Config {
    CONFIG.get().expect("Config must be initialized with init_config() before use")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_poll_interval_bounds() {
        let config = Config {
            poll_interval_secs: 2,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_contract_address_must_be_hex() {
        let config = Config {
            contract_address: Some("not-an-address".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rpc_url_scheme() {
        let config = Config {
            rpc_url: Some("ws://127.0.0.1:8545".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            rpc_url: Some("http://127.0.0.1:8545".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
