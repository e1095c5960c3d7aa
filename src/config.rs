//! Environment-based defaults for btc-keygen
//!
//! Command line flags always win; these variables only change what happens
//! when a flag is left out.
//!
//! - `BTC_KEYGEN_NETWORK` - "mainnet" or "testnet" (default: "mainnet")
//! - `BTC_KEYGEN_ADDRESS_TYPE` - p2pkh, p2sh, p2wpkh or p2tr (default: "p2pkh")
//! - `BTC_KEYGEN_LOG_LEVEL` - trace, debug, info, warn, error (default: "warn")
//! - `BTC_KEYGEN_LOG_JSON` - set to "1" for JSON log lines on stderr

use std::env;

use thiserror::Error;

use crate::address::AddressType;
use crate::network::Network;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Defaults applied before command line flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeygenConfig {
    /// Network used when `-testnet` is absent
    pub network: Network,

    /// Raw address type tag; validated later so an unknown tag stays recoverable
    pub address_type: String,

    /// Log level
    pub log_level: String,

    /// Emit logs as JSON
    pub log_json: bool,
}

impl Default for KeygenConfig {
    fn default() -> Self {
        Self {
            network: Network::Mainnet,
            address_type: AddressType::default().as_str().to_string(),
            log_level: "warn".to_string(),
            log_json: false,
        }
    }
}

impl KeygenConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let network = match lookup("BTC_KEYGEN_NETWORK").filter(|v| !v.is_empty()) {
            Some(value) => value.parse()?,
            None => defaults.network,
        };

        let address_type = lookup("BTC_KEYGEN_ADDRESS_TYPE")
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.address_type);

        let log_level = lookup("BTC_KEYGEN_LOG_LEVEL")
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.log_level);

        let log_json = match lookup("BTC_KEYGEN_LOG_JSON").as_deref() {
            None | Some("") | Some("0") => false,
            Some("1") | Some("true") => true,
            Some(other) => {
                return Err(ConfigError::InvalidValue(
                    "BTC_KEYGEN_LOG_JSON".to_string(),
                    format!("expected 0 or 1, got {}", other),
                ))
            }
        };

        Ok(Self {
            network,
            address_type,
            log_level,
            log_json,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<KeygenConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        KeygenConfig::from_vars(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_env() {
        let config = load(&[]).unwrap();
        assert_eq!(config, KeygenConfig::default());
        assert_eq!(config.address_type, "p2pkh");
        assert_eq!(config.network, Network::Mainnet);
    }

    #[test]
    fn test_env_overrides() {
        let config = load(&[
            ("BTC_KEYGEN_NETWORK", "testnet"),
            ("BTC_KEYGEN_ADDRESS_TYPE", "p2tr"),
            ("BTC_KEYGEN_LOG_LEVEL", "debug"),
            ("BTC_KEYGEN_LOG_JSON", "1"),
        ])
        .unwrap();

        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.address_type, "p2tr");
        assert_eq!(config.log_level, "debug");
        assert!(config.log_json);
    }

    #[test]
    fn test_unknown_address_type_is_kept_raw() {
        let config = load(&[("BTC_KEYGEN_ADDRESS_TYPE", "p2wsh")]).unwrap();
        assert_eq!(config.address_type, "p2wsh");
    }

    #[test]
    fn test_invalid_values() {
        assert!(load(&[("BTC_KEYGEN_NETWORK", "regtest")]).is_err());
        assert!(load(&[("BTC_KEYGEN_LOG_JSON", "yes")]).is_err());
    }
}
