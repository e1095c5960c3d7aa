//! Error Types for btc-keygen
//!
//! Every fallible operation in the crate returns [`KeygenError`].

use thiserror::Error;

use crate::network::Network;

/// Root error type for btc-keygen
#[derive(Debug, Error)]
pub enum KeygenError {
    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Logging errors
    #[error("logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// The entropy source could not produce a private key
    #[error("failed to generate private key: {0}")]
    KeyGeneration(String),

    /// WIF string failed Base58Check or structural validation
    #[error("invalid WIF private key: {0}")]
    InvalidWif(String),

    /// WIF network byte does not match the selected network
    #[error("private key network mismatch: expected {expected}, got {actual}")]
    NetworkMismatch { expected: Network, actual: Network },

    /// Address type tag not one of p2pkh, p2sh, p2wpkh, p2tr
    #[error("unsupported address type: {0}")]
    UnsupportedAddressType(String),

    /// Address string could not be parsed
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Address is valid but belongs to another network
    #[error("address {address} is not valid for {network}")]
    ForeignAddress { address: String, network: Network },

    /// Address decodes for the right network but commits to another key
    #[error("address {0} does not belong to the given public key")]
    KeyMismatch(String),

    /// Report serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl KeygenError {
    /// Create a key generation error
    pub fn key_generation(msg: impl Into<String>) -> Self {
        Self::KeyGeneration(msg.into())
    }

    /// Create an invalid WIF error
    pub fn invalid_wif(msg: impl Into<String>) -> Self {
        Self::InvalidWif(msg.into())
    }

    /// Create an invalid address error
    pub fn invalid_address(msg: impl Into<String>) -> Self {
        Self::InvalidAddress(msg.into())
    }

    /// Whether the CLI can keep going after this error.
    ///
    /// Only an unknown address type is recoverable: key material is still
    /// reported and the address line carries the failure instead.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, KeygenError::UnsupportedAddressType(_))
    }

    /// Stable error code for machine-readable output
    pub fn error_code(&self) -> &'static str {
        match self {
            KeygenError::Config(_) => "CONFIG_ERROR",
            KeygenError::Logging(_) => "LOGGING_ERROR",
            KeygenError::KeyGeneration(_) => "KEY_GENERATION_ERROR",
            KeygenError::InvalidWif(_) => "INVALID_WIF",
            KeygenError::NetworkMismatch { .. } => "NETWORK_MISMATCH",
            KeygenError::UnsupportedAddressType(_) => "UNSUPPORTED_ADDRESS_TYPE",
            KeygenError::InvalidAddress(_) => "INVALID_ADDRESS",
            KeygenError::ForeignAddress { .. } => "FOREIGN_ADDRESS",
            KeygenError::KeyMismatch(_) => "KEY_MISMATCH",
            KeygenError::Serialization(_) => "SERIALIZATION_ERROR",
            KeygenError::Io(_) => "IO_ERROR",
        }
    }
}

/// Result type alias using KeygenError
pub type Result<T> = std::result::Result<T, KeygenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = KeygenError::invalid_wif("checksum mismatch");
        assert!(err.to_string().contains("checksum mismatch"));
        assert_eq!(err.error_code(), "INVALID_WIF");
    }

    #[test]
    fn test_network_mismatch_message() {
        let err = KeygenError::NetworkMismatch {
            expected: Network::Mainnet,
            actual: Network::Testnet,
        };
        assert_eq!(
            err.to_string(),
            "private key network mismatch: expected mainnet, got testnet"
        );
    }

    #[test]
    fn test_recoverable_errors() {
        assert!(KeygenError::UnsupportedAddressType("p2wsh".into()).is_recoverable());
        assert!(!KeygenError::invalid_wif("bad").is_recoverable());
        assert!(!KeygenError::key_generation("no entropy").is_recoverable());
    }
}
