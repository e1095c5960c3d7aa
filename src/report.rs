//! Report assembly and rendering
//!
//! The report always carries the public key. The WIF is included only for
//! freshly generated keys, and an unknown address type leaves `address` empty
//! with the reason in `address_error`.

use std::io::Write;

use serde::Serialize;

use crate::address::{derive_address, verify_address, AddressType};
use crate::error::Result;
use crate::keys::{KeyPair, KeySource};
use crate::network::Network;

/// Placeholder printed when no address could be derived
pub const UNSUPPORTED_ADDRESS_NOTICE: &str = "unsupported address type";

/// Output format for the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Everything printed for one run
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Generated or imported
    pub source: KeySource,
    /// Address type exactly as requested
    pub address_type: String,
    pub network: Network,
    /// WIF private key (generated keys only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wif: Option<String>,
    /// Compressed public key (hex)
    pub public_key: String,
    /// Locking script of the derived address (hex)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_pubkey: Option<String>,
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_error: Option<String>,
}

impl Report {
    /// Derive the requested address for `key` and collect the output fields.
    ///
    /// An unknown `address_tag` is not an error here: it is logged and
    /// recorded in `address_error` so the key material is still reported.
    pub fn build(key: &KeyPair, address_tag: &str, network: Network) -> Self {
        let (address, script_pubkey, address_error) = match address_tag.parse::<AddressType>() {
            Ok(address_type) => {
                let derived = derive_address(key.public_key(), address_type, network);
                let encoded = derived.to_string();

                match verify_address(&encoded, key.public_key(), network) {
                    Ok(_) => tracing::debug!(
                        address = %encoded,
                        address_type = %address_type,
                        "Derived address verified"
                    ),
                    Err(e) => tracing::warn!(address = %encoded, "Address self-check failed: {}", e),
                }

                (Some(encoded), Some(derived.script_pubkey_hex()), None)
            }
            Err(e) => {
                tracing::warn!(
                    address_type = %address_tag,
                    error_code = e.error_code(),
                    "Cannot derive address: {}",
                    e
                );
                (None, None, Some(e.to_string()))
            }
        };

        let wif = match key.source() {
            KeySource::Generated => Some(key.to_wif()),
            KeySource::Imported => None,
        };

        Self {
            source: key.source(),
            address_type: address_tag.to_string(),
            network,
            wif,
            public_key: hex::encode(key.public_key_bytes()),
            script_pubkey,
            address,
            address_error,
        }
    }

    /// Plain text, one field per line
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        let header = match self.source {
            KeySource::Generated => "Generated new Bitcoin key pair",
            KeySource::Imported => "Imported Bitcoin public key from private key",
        };
        out.push_str(&format!("{} ({}, {})\n", header, self.address_type, self.network));

        if let Some(wif) = &self.wif {
            out.push_str(&format!("Private key (WIF): {}\n", wif));
        }
        out.push_str(&format!("Public key (compressed): {}\n", self.public_key));

        match &self.address {
            Some(address) => out.push_str(&format!("Address: {}\n", address)),
            None => out.push_str(&format!("Address: {}\n", UNSUPPORTED_ADDRESS_NOTICE)),
        }

        out
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report in `format` followed by a newline for JSON
    pub fn write_to<W: Write>(&self, writer: &mut W, format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Text => writer.write_all(self.render_text().as_bytes())?,
            OutputFormat::Json => writeln!(writer, "{}", self.to_json()?)?,
        }
        writer.flush()?;
        Ok(())
    }
}
