//! Ed25519 public key identified by a `G…` account id.

use std::fmt;
use std::str::FromStr;

use ed25519_dalek::{Signature, VerifyingKey};

use crate::strkey::{self, VersionByte};
use crate::PrimitivesError;

/// Length of a raw Ed25519 public key in bytes.
pub const PUBLIC_KEY_LEN: usize = 32;

/// An Ed25519 public key, the identity of a Stellar account.
///
/// Stored as raw bytes so that any 32-byte value decoded from the wire can
/// be represented; curve validity is only checked when verifying.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublicKey([u8; PUBLIC_KEY_LEN]);

impl PublicKey {
    /// Wrap raw public key bytes.
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_LEN]) -> Self {
        PublicKey(bytes)
    }

    /// Create a public key from a byte slice.
    ///
    /// # Returns
    /// `Ok(PublicKey)` if the slice is exactly 32 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let arr: [u8; PUBLIC_KEY_LEN] =
            bytes
                .try_into()
                .map_err(|_| PrimitivesError::InvalidKeyLength {
                    expected: PUBLIC_KEY_LEN,
                    got: bytes.len(),
                })?;
        Ok(PublicKey(arr))
    }

    /// Parse a `G…` account id.
    pub fn from_account_id(account_id: &str) -> Result<Self, PrimitivesError> {
        let payload = strkey::decode(VersionByte::AccountId, account_id)?;
        Self::from_slice(&payload)
    }

    /// Render this key as a `G…` account id.
    pub fn account_id(&self) -> String {
        strkey::encode(VersionByte::AccountId, &self.0)
    }

    /// The raw key bytes.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }

    /// The signature hint for this key: its last four bytes.
    pub fn signature_hint(&self) -> [u8; 4] {
        let mut hint = [0u8; 4];
        hint.copy_from_slice(&self.0[PUBLIC_KEY_LEN - 4..]);
        hint
    }

    /// Verify an Ed25519 signature over `data`.
    ///
    /// # Returns
    /// `true` if the signature is valid for this key; `false` for a bad
    /// signature, a malformed signature, or a key that is not a curve point.
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.0) else {
            return false;
        };
        let Ok(signature) = Signature::from_slice(signature) else {
            return false;
        };
        verifying_key.verify_strict(data, &signature).is_ok()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.account_id())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.account_id())
    }
}

impl FromStr for PublicKey {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_account_id(s)
    }
}
