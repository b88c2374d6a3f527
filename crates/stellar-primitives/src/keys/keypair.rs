//! Ed25519 key pair with an optional secret half.
//!
//! A key pair built from an account id can verify but not sign; one built
//! from a secret seed (or generated randomly) can do both.

use std::fmt;

use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;

use crate::keys::public_key::PublicKey;
use crate::strkey::{self, VersionByte};
use crate::PrimitivesError;

/// Length of an Ed25519 secret seed in bytes.
const SEED_LEN: usize = 32;

/// An Ed25519 key pair identified by its Stellar account id.
#[derive(Clone)]
pub struct KeyPair {
    public_key: PublicKey,
    signing_key: Option<SigningKey>,
}

impl KeyPair {
    /// Generate a new random key pair using the OS random number generator.
    pub fn random() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        Self::from_signing_key(signing_key)
    }

    /// Create a key pair from a raw 32-byte secret seed.
    ///
    /// # Arguments
    /// * `seed` - The Ed25519 secret seed.
    ///
    /// # Returns
    /// `Ok(KeyPair)` if the seed is exactly 32 bytes long.
    pub fn from_raw_seed(seed: &[u8]) -> Result<Self, PrimitivesError> {
        let seed: [u8; SEED_LEN] = seed.try_into().map_err(|_| {
            PrimitivesError::InvalidSecretSeed(format!(
                "expected {} bytes, got {}",
                SEED_LEN,
                seed.len()
            ))
        })?;
        Ok(Self::from_signing_key(SigningKey::from_bytes(&seed)))
    }

    /// Create a key pair from an `S…` secret seed.
    pub fn from_secret_seed(secret_seed: &str) -> Result<Self, PrimitivesError> {
        let seed = strkey::decode(VersionByte::SecretSeed, secret_seed)
            .map_err(|e| PrimitivesError::InvalidSecretSeed(e.to_string()))?;
        Self::from_raw_seed(&seed)
    }

    /// Create a verify-only key pair from a `G…` account id.
    pub fn from_account_id(account_id: &str) -> Result<Self, PrimitivesError> {
        Ok(Self::from_public_key(PublicKey::from_account_id(account_id)?))
    }

    /// Create a verify-only key pair from a public key.
    pub fn from_public_key(public_key: PublicKey) -> Self {
        KeyPair {
            public_key,
            signing_key: None,
        }
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let public_key = PublicKey::from_bytes(signing_key.verifying_key().to_bytes());
        KeyPair {
            public_key,
            signing_key: Some(signing_key),
        }
    }

    /// The public half of this key pair.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// The `G…` account id of this key pair.
    pub fn account_id(&self) -> String {
        self.public_key.account_id()
    }

    /// The `S…` secret seed, if this key pair can sign.
    pub fn secret_seed(&self) -> Option<String> {
        self.signing_key
            .as_ref()
            .map(|key| strkey::encode(VersionByte::SecretSeed, &key.to_bytes()))
    }

    /// Whether this key pair holds a secret key.
    pub fn can_sign(&self) -> bool {
        self.signing_key.is_some()
    }

    /// The last four bytes of the public key, used to decorate signatures.
    pub fn signature_hint(&self) -> [u8; 4] {
        self.public_key.signature_hint()
    }

    /// Sign `data` with Ed25519.
    ///
    /// # Returns
    /// The 64-byte signature, or `MissingSecretKey` for a verify-only pair.
    pub fn sign(&self, data: &[u8]) -> Result<[u8; 64], PrimitivesError> {
        let signing_key = self
            .signing_key
            .as_ref()
            .ok_or(PrimitivesError::MissingSecretKey)?;
        Ok(signing_key.sign(data).to_bytes())
    }

    /// Verify an Ed25519 signature over `data` against this key pair's public key.
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> bool {
        self.public_key.verify(data, signature)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("account_id", &self.public_key.account_id())
            .field("can_sign", &self.can_sign())
            .finish()
    }
}
