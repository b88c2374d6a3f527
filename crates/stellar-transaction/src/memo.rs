//! Transaction memos.

use crate::codec::{unknown_discriminant, Decoder, Encoder, XdrCodec};
use crate::TransactionError;

/// Maximum length of a text memo in bytes.
pub const MAX_MEMO_TEXT_LEN: usize = 28;

const MEMO_NONE: i32 = 0;
const MEMO_TEXT: i32 = 1;
const MEMO_ID: i32 = 2;
const MEMO_HASH: i32 = 3;
const MEMO_RETURN: i32 = 4;

/// Optional extra data attached to a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Memo {
    /// No memo.
    #[default]
    None,
    /// UTF-8 text of at most 28 bytes.
    ///
    /// The ledger allows any bytes here; envelopes whose text memo is not
    /// valid UTF-8 are rejected as malformed when decoded.
    Text(String),
    /// 64-bit id.
    Id(u64),
    /// 32-byte hash.
    Hash([u8; 32]),
    /// 32-byte hash of the transaction being refunded.
    Return([u8; 32]),
}

impl Memo {
    /// Create a text memo, checking the 28-byte limit.
    pub fn text(text: impl Into<String>) -> Result<Self, TransactionError> {
        let text = text.into();
        if text.len() > MAX_MEMO_TEXT_LEN {
            return Err(TransactionError::InvalidMemo(format!(
                "text memo is {} bytes, maximum is {}",
                text.len(),
                MAX_MEMO_TEXT_LEN
            )));
        }
        Ok(Memo::Text(text))
    }

    /// Create an id memo.
    pub fn id(id: u64) -> Self {
        Memo::Id(id)
    }

    /// Create a hash memo.
    pub fn hash(hash: [u8; 32]) -> Self {
        Memo::Hash(hash)
    }

    /// Create a return-hash memo.
    pub fn return_hash(hash: [u8; 32]) -> Self {
        Memo::Return(hash)
    }

    /// Whether this is the empty memo.
    pub fn is_none(&self) -> bool {
        matches!(self, Memo::None)
    }
}

impl XdrCodec for Memo {
    fn encode(&self, enc: &mut Encoder) -> Result<(), TransactionError> {
        match self {
            Memo::None => enc.write_i32(MEMO_NONE),
            Memo::Text(text) => {
                enc.write_i32(MEMO_TEXT);
                enc.write_string(text, MAX_MEMO_TEXT_LEN)?;
            }
            Memo::Id(id) => {
                enc.write_i32(MEMO_ID);
                enc.write_u64(*id);
            }
            Memo::Hash(hash) => {
                enc.write_i32(MEMO_HASH);
                enc.write_fixed_opaque(hash);
            }
            Memo::Return(hash) => {
                enc.write_i32(MEMO_RETURN);
                enc.write_fixed_opaque(hash);
            }
        }
        Ok(())
    }

    fn decode(dec: &mut Decoder<'_>) -> Result<Self, TransactionError> {
        match dec.read_i32()? {
            MEMO_NONE => Ok(Memo::None),
            MEMO_TEXT => Ok(Memo::Text(dec.read_string(MAX_MEMO_TEXT_LEN)?)),
            MEMO_ID => Ok(Memo::Id(dec.read_u64()?)),
            MEMO_HASH => Ok(Memo::Hash(dec.read_array32()?)),
            MEMO_RETURN => Ok(Memo::Return(dec.read_array32()?)),
            v => Err(unknown_discriminant("memo type", v)),
        }
    }
}
