//! Key acquisition: fresh generation or WIF import
//!
//! All curve arithmetic and the WIF codec come from `secp256k1` and
//! `bitcoin`; this module only decides which network and compression flag a
//! key is bound to.

use std::fmt;

use bitcoin::{CompressedPublicKey, PrivateKey, XOnlyPublicKey};
use rand::rngs::OsRng;
use rand::RngCore;
use secp256k1::{Secp256k1, SecretKey};
use serde::Serialize;

use crate::error::{KeygenError, Result};
use crate::network::Network;

/// Where a key pair came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeySource {
    /// Freshly drawn from the OS entropy source
    Generated,
    /// Decoded from a caller-supplied WIF string
    Imported,
}

/// A private key bound to a network plus its compressed public key
#[derive(Clone)]
pub struct KeyPair {
    private_key: PrivateKey,
    public_key: CompressedPublicKey,
    source: KeySource,
}

impl KeyPair {
    /// Generate a new random key pair from the OS entropy source
    pub fn generate(network: Network) -> Result<Self> {
        Self::generate_with_rng(&mut OsRng, network)
    }

    /// Generate a new key pair from the given RNG.
    ///
    /// Candidates outside `[1, n)` are rejected and redrawn. The only failure
    /// is the RNG itself refusing to produce bytes.
    pub fn generate_with_rng<R: RngCore + ?Sized>(rng: &mut R, network: Network) -> Result<Self> {
        let mut bytes = [0u8; 32];
        let secret_key = loop {
            rng.try_fill_bytes(&mut bytes)
                .map_err(|e| KeygenError::key_generation(e.to_string()))?;
            if let Ok(secret_key) = SecretKey::from_slice(&bytes) {
                break secret_key;
            }
        };
        bytes.fill(0);

        let private_key = PrivateKey::new(secret_key, network.kind());

        tracing::debug!(network = %network, "Generated new private key");

        Ok(Self::from_private_key(private_key, KeySource::Generated))
    }

    /// Decode a WIF private key and check it belongs to `network`
    pub fn from_wif(wif: &str, network: Network) -> Result<Self> {
        let private_key =
            PrivateKey::from_wif(wif.trim()).map_err(|e| KeygenError::invalid_wif(e.to_string()))?;

        let actual = Network::from(private_key.network);
        if actual != network {
            return Err(KeygenError::NetworkMismatch {
                expected: network,
                actual,
            });
        }

        tracing::debug!(
            network = %network,
            compressed = private_key.compressed,
            "Imported WIF private key"
        );

        Ok(Self::from_private_key(private_key, KeySource::Imported))
    }

    fn from_private_key(private_key: PrivateKey, source: KeySource) -> Self {
        let secp = Secp256k1::signing_only();
        // Uncompressed WIFs still hash the compressed encoding.
        let public_key = CompressedPublicKey(private_key.inner.public_key(&secp));

        Self {
            private_key,
            public_key,
            source,
        }
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    pub fn public_key(&self) -> &CompressedPublicKey {
        &self.public_key
    }

    pub fn source(&self) -> KeySource {
        self.source
    }

    /// Network the private key is bound to
    pub fn network(&self) -> Network {
        Network::from(self.private_key.network)
    }

    /// WIF encoding bound to the key's network and compression flag
    pub fn to_wif(&self) -> String {
        self.private_key.to_wif()
    }

    /// 33-byte compressed SEC1 encoding
    pub fn public_key_bytes(&self) -> [u8; 33] {
        self.public_key.0.serialize()
    }

    /// X coordinate only, parity dropped
    pub fn x_only_public_key(&self) -> XOnlyPublicKey {
        self.public_key.0.x_only_public_key().0
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &hex::encode(self.public_key_bytes()))
            .field("network", &self.network())
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}
