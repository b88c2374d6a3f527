//! Stellar networks, identified by their passphrase.
//!
//! Every signature commits to the network id (SHA-256 of the passphrase),
//! so a transaction signed for testnet cannot be replayed on the public
//! network.

use std::fmt;

use crate::hash::sha256;

/// Passphrase of the public Stellar network.
pub const PUBLIC_PASSPHRASE: &str = "Public Global Stellar Network ; September 2015";

/// Passphrase of the SDF test network.
pub const TESTNET_PASSPHRASE: &str = "Test SDF Network ; September 2015";

/// Passphrase of the SDF future network.
pub const FUTURENET_PASSPHRASE: &str = "Test SDF Future Network ; October 2022";

/// A Stellar network.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Network {
    passphrase: String,
}

impl Network {
    /// Create a network from an arbitrary passphrase (e.g. a standalone network).
    pub fn new(passphrase: impl Into<String>) -> Self {
        Network {
            passphrase: passphrase.into(),
        }
    }

    /// The public Stellar network.
    pub fn public() -> Self {
        Self::new(PUBLIC_PASSPHRASE)
    }

    /// The SDF test network.
    pub fn testnet() -> Self {
        Self::new(TESTNET_PASSPHRASE)
    }

    /// The SDF future network.
    pub fn futurenet() -> Self {
        Self::new(FUTURENET_PASSPHRASE)
    }

    /// The network passphrase.
    pub fn passphrase(&self) -> &str {
        &self.passphrase
    }

    /// The network id: SHA-256 of the passphrase.
    pub fn network_id(&self) -> [u8; 32] {
        sha256(self.passphrase.as_bytes())
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.passphrase)
    }
}
