//! Source accounts: the caller-held `Account` and the wire `MuxedAccount`.

use std::fmt;
use std::str::FromStr;

use stellar_primitives::strkey::{self, VersionByte};
use stellar_primitives::PublicKey;

use crate::codec::{unknown_discriminant, Decoder, Encoder, XdrCodec};
use crate::TransactionError;

/// `KEY_TYPE_ED25519` discriminant.
const KEY_TYPE_ED25519: i32 = 0;

/// `KEY_TYPE_MUXED_ED25519` discriminant.
const KEY_TYPE_MUXED_ED25519: i32 = 0x100;

/// An account as seen by the transaction builder: its identity and the
/// sequence number last used on the ledger.
///
/// The builder reads the sequence number, uses `sequence_number + 1` for the
/// new transaction, and advances this value. Two builders working from the
/// same `Account` without coordination will produce transactions with the
/// same sequence number and one of them will fail with `tx_bad_seq`; callers
/// must serialize "load, build, submit" per account themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// The account's public key.
    pub account_id: PublicKey,
    /// Sequence number of the last transaction applied for this account.
    pub sequence_number: i64,
    /// Optional muxed id, making this a virtual `M…` sub-account.
    pub muxed_id: Option<u64>,
}

impl Account {
    /// Create an account snapshot from its id and current sequence number.
    pub fn new(account_id: PublicKey, sequence_number: i64) -> Self {
        Account {
            account_id,
            sequence_number,
            muxed_id: None,
        }
    }

    /// Use this account through a muxed id.
    pub fn with_muxed_id(mut self, id: u64) -> Self {
        self.muxed_id = Some(id);
        self
    }

    /// The wire form of this account as a transaction source.
    pub fn muxed_account(&self) -> MuxedAccount {
        match self.muxed_id {
            Some(id) => MuxedAccount::MuxedEd25519 {
                id,
                key: self.account_id,
            },
            None => MuxedAccount::Ed25519(self.account_id),
        }
    }

    /// The sequence number the next transaction must carry.
    pub fn next_sequence_number(&self) -> Result<i64, TransactionError> {
        self.sequence_number.checked_add(1).ok_or_else(|| {
            TransactionError::InvalidOperation("sequence number overflow".to_string())
        })
    }
}

/// An account reference that may carry a 64-bit muxed id.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum MuxedAccount {
    /// A plain `G…` account.
    Ed25519(PublicKey),
    /// An `M…` account: a `G…` account plus a sub-account id.
    MuxedEd25519 {
        /// Sub-account id.
        id: u64,
        /// Underlying account key.
        key: PublicKey,
    },
}

impl MuxedAccount {
    /// Parse a `G…` or `M…` address.
    pub fn from_address(address: &str) -> Result<Self, TransactionError> {
        if address.starts_with('M') {
            let payload = strkey::decode(VersionByte::MuxedAccount, address)?;
            let key = PublicKey::from_slice(&payload[..32])?;
            let mut id_bytes = [0u8; 8];
            id_bytes.copy_from_slice(&payload[32..40]);
            Ok(MuxedAccount::MuxedEd25519 {
                id: u64::from_be_bytes(id_bytes),
                key,
            })
        } else {
            Ok(MuxedAccount::Ed25519(PublicKey::from_account_id(address)?))
        }
    }

    /// Render as a `G…` or `M…` address.
    pub fn address(&self) -> String {
        match self {
            MuxedAccount::Ed25519(key) => key.account_id(),
            MuxedAccount::MuxedEd25519 { id, key } => {
                let mut payload = Vec::with_capacity(40);
                payload.extend_from_slice(key.as_bytes());
                payload.extend_from_slice(&id.to_be_bytes());
                strkey::encode(VersionByte::MuxedAccount, &payload)
            }
        }
    }

    /// The underlying `G…` account key.
    pub fn account_id(&self) -> &PublicKey {
        match self {
            MuxedAccount::Ed25519(key) => key,
            MuxedAccount::MuxedEd25519 { key, .. } => key,
        }
    }

    /// The muxed id, if any.
    pub fn muxed_id(&self) -> Option<u64> {
        match self {
            MuxedAccount::Ed25519(_) => None,
            MuxedAccount::MuxedEd25519 { id, .. } => Some(*id),
        }
    }
}

impl From<PublicKey> for MuxedAccount {
    fn from(key: PublicKey) -> Self {
        MuxedAccount::Ed25519(key)
    }
}

impl FromStr for MuxedAccount {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_address(s)
    }
}

impl fmt::Display for MuxedAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address())
    }
}

impl fmt::Debug for MuxedAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MuxedAccount({})", self.address())
    }
}

impl XdrCodec for MuxedAccount {
    fn encode(&self, enc: &mut Encoder) -> Result<(), TransactionError> {
        match self {
            MuxedAccount::Ed25519(key) => {
                enc.write_i32(KEY_TYPE_ED25519);
                enc.write_fixed_opaque(key.as_bytes());
            }
            MuxedAccount::MuxedEd25519 { id, key } => {
                enc.write_i32(KEY_TYPE_MUXED_ED25519);
                enc.write_u64(*id);
                enc.write_fixed_opaque(key.as_bytes());
            }
        }
        Ok(())
    }

    fn decode(dec: &mut Decoder<'_>) -> Result<Self, TransactionError> {
        match dec.read_i32()? {
            KEY_TYPE_ED25519 => Ok(MuxedAccount::Ed25519(PublicKey::from_bytes(
                dec.read_array32()?,
            ))),
            KEY_TYPE_MUXED_ED25519 => {
                let id = dec.read_u64()?;
                let key = PublicKey::from_bytes(dec.read_array32()?);
                Ok(MuxedAccount::MuxedEd25519 { id, key })
            }
            v => Err(unknown_discriminant("muxed account type", v)),
        }
    }
}
