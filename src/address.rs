//! Address derivation for the four supported output types
//!
//! | type   | payload                               | encoding             |
//! |--------|---------------------------------------|----------------------|
//! | p2pkh  | HASH160(pubkey)                       | Base58Check          |
//! | p2sh   | HASH160(OP_0 <HASH160(pubkey)>)       | Base58Check          |
//! | p2wpkh | HASH160(pubkey), witness v0           | Bech32               |
//! | p2tr   | BIP341-tweaked x-only key, witness v1 | Bech32m              |
//!
//! The Taproot output key is tweaked with an empty script tree so the address
//! matches what BIP86 wallets derive for the same key.

use std::fmt;
use std::str::FromStr;

use bitcoin::address::NetworkUnchecked;
use bitcoin::key::Secp256k1;
use bitcoin::{Address, CompressedPublicKey};
use serde::Serialize;

use crate::error::{KeygenError, Result};
use crate::network::Network;

/// Supported address formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    /// Legacy pay-to-pubkey-hash (1... / m..., n...)
    #[default]
    P2pkh,
    /// P2WPKH nested in P2SH (3... / 2...)
    P2sh,
    /// Native segwit v0 (bc1q... / tb1q...)
    P2wpkh,
    /// Taproot key-path only (bc1p... / tb1p...)
    P2tr,
}

impl AddressType {
    pub const ALL: [AddressType; 4] = [
        AddressType::P2pkh,
        AddressType::P2sh,
        AddressType::P2wpkh,
        AddressType::P2tr,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AddressType::P2pkh => "p2pkh",
            AddressType::P2sh => "p2sh",
            AddressType::P2wpkh => "p2wpkh",
            AddressType::P2tr => "p2tr",
        }
    }

    fn from_bitcoin(address_type: bitcoin::AddressType) -> Option<Self> {
        match address_type {
            bitcoin::AddressType::P2pkh => Some(AddressType::P2pkh),
            bitcoin::AddressType::P2sh => Some(AddressType::P2sh),
            bitcoin::AddressType::P2wpkh => Some(AddressType::P2wpkh),
            bitcoin::AddressType::P2tr => Some(AddressType::P2tr),
            _ => None,
        }
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AddressType {
    type Err = KeygenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "p2pkh" => Ok(AddressType::P2pkh),
            "p2sh" => Ok(AddressType::P2sh),
            "p2wpkh" => Ok(AddressType::P2wpkh),
            "p2tr" => Ok(AddressType::P2tr),
            _ => Err(KeygenError::UnsupportedAddressType(s.to_string())),
        }
    }
}

/// An address together with the parameters it was derived under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedAddress {
    pub address_type: AddressType,
    pub network: Network,
    pub address: Address,
}

impl DerivedAddress {
    /// Hex of the locking script this address pays to
    pub fn script_pubkey_hex(&self) -> String {
        hex::encode(self.address.script_pubkey().as_bytes())
    }
}

impl fmt::Display for DerivedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.address, f)
    }
}

/// Derive the address of `address_type` for a compressed public key
pub fn derive_address(
    public_key: &CompressedPublicKey,
    address_type: AddressType,
    network: Network,
) -> DerivedAddress {
    let address = match address_type {
        AddressType::P2pkh => Address::p2pkh(public_key.pubkey_hash(), network.kind()),
        // Redeem script is OP_0 <20-byte key hash>
        AddressType::P2sh => Address::p2shwpkh(public_key, network.kind()),
        AddressType::P2wpkh => Address::p2wpkh(public_key, network.bitcoin_network()),
        AddressType::P2tr => {
            let secp = Secp256k1::verification_only();
            let (internal_key, _parity) = public_key.0.x_only_public_key();
            Address::p2tr(&secp, internal_key, None, network.bitcoin_network())
        }
    };

    DerivedAddress {
        address_type,
        network,
        address,
    }
}

/// Parse `address`, require it to belong to `network` and to `public_key`.
///
/// Returns the detected address type. P2SH addresses are assumed to wrap a
/// P2WPKH program since that is the only script this crate produces.
pub fn verify_address(
    address: &str,
    public_key: &CompressedPublicKey,
    network: Network,
) -> Result<AddressType> {
    let unchecked: Address<NetworkUnchecked> = address
        .trim()
        .parse()
        .map_err(|e: bitcoin::address::ParseError| KeygenError::invalid_address(e.to_string()))?;

    let checked = unchecked
        .require_network(network.bitcoin_network())
        .map_err(|_| KeygenError::ForeignAddress {
            address: address.to_string(),
            network,
        })?;

    let address_type = checked
        .address_type()
        .and_then(AddressType::from_bitcoin)
        .ok_or_else(|| KeygenError::invalid_address(format!("unsupported output type: {}", address)))?;

    let expected = derive_address(public_key, address_type, network);
    if expected.address != checked {
        return Err(KeygenError::KeyMismatch(address.to_string()));
    }

    Ok(address_type)
}
