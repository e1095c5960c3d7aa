//! Bitcoin key pair generation and address derivation
//!
//! Generates a fresh secp256k1 key or imports one from WIF, then derives a
//! P2PKH, P2SH-P2WPKH, P2WPKH or P2TR address for mainnet or testnet.
//!
//! # Usage
//!
//! ```bash
//! btc-keygen -generate -type p2wpkh
//! btc-keygen -import cVt4o7BGAig1UXywgGSmARhxMdzP5qvQsxKkSsc1XEkw3tDTQFpy -testnet
//! ```
//!
//! Elliptic-curve math, Base58Check, Bech32/Bech32m and Taproot tweaking are
//! all provided by the `bitcoin` and `secp256k1` crates.

pub mod address;
pub mod cli;
pub mod config;
pub mod error;
pub mod keys;
pub mod logging;
pub mod network;
pub mod report;

pub use address::{derive_address, verify_address, AddressType, DerivedAddress};
pub use config::{ConfigError, KeygenConfig};
pub use error::{KeygenError, Result};
pub use keys::{KeyPair, KeySource};
pub use network::Network;
pub use report::{OutputFormat, Report};
