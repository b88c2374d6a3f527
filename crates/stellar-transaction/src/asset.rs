//! Assets: the native lumen and issued credit assets.

use std::fmt;
use std::str::FromStr;

use stellar_primitives::PublicKey;

use crate::codec::{unknown_discriminant, Decoder, Encoder, XdrCodec};
use crate::TransactionError;

const ASSET_TYPE_NATIVE: i32 = 0;
const ASSET_TYPE_CREDIT_ALPHANUM4: i32 = 1;
const ASSET_TYPE_CREDIT_ALPHANUM12: i32 = 2;

/// A Stellar asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Asset {
    /// Lumens (XLM).
    Native,
    /// An issued asset with a 1–4 character code.
    CreditAlphanum4 {
        /// Asset code.
        code: String,
        /// Issuing account.
        issuer: PublicKey,
    },
    /// An issued asset with a 5–12 character code.
    CreditAlphanum12 {
        /// Asset code.
        code: String,
        /// Issuing account.
        issuer: PublicKey,
    },
}

impl Asset {
    /// Create an issued asset, choosing the alphanum4 or alphanum12 form
    /// from the code length.
    ///
    /// # Returns
    /// `InvalidAsset` if the code is empty, longer than 12 characters, or
    /// not ASCII alphanumeric.
    pub fn credit(code: &str, issuer: PublicKey) -> Result<Self, TransactionError> {
        validate_code(code)?;
        let code = code.to_string();
        if code.len() <= 4 {
            Ok(Asset::CreditAlphanum4 { code, issuer })
        } else {
            Ok(Asset::CreditAlphanum12 { code, issuer })
        }
    }

    /// Parse the canonical form: `XLM` / `native`, or `CODE:ISSUER`.
    pub fn from_canonical(s: &str) -> Result<Self, TransactionError> {
        if s == "XLM" || s == "native" {
            return Ok(Asset::Native);
        }
        let (code, issuer) = s
            .split_once(':')
            .ok_or_else(|| TransactionError::InvalidAsset(format!("expected CODE:ISSUER, got {:?}", s)))?;
        let issuer = PublicKey::from_account_id(issuer)
            .map_err(|e| TransactionError::InvalidAsset(format!("bad issuer: {}", e)))?;
        Self::credit(code, issuer)
    }

    /// Render the canonical form.
    pub fn canonical(&self) -> String {
        match self {
            Asset::Native => "XLM".to_string(),
            Asset::CreditAlphanum4 { code, issuer } | Asset::CreditAlphanum12 { code, issuer } => {
                format!("{}:{}", code, issuer.account_id())
            }
        }
    }

    /// The asset code (`XLM` for native).
    pub fn code(&self) -> &str {
        match self {
            Asset::Native => "XLM",
            Asset::CreditAlphanum4 { code, .. } | Asset::CreditAlphanum12 { code, .. } => code,
        }
    }

    /// The issuer, if this is an issued asset.
    pub fn issuer(&self) -> Option<&PublicKey> {
        match self {
            Asset::Native => None,
            Asset::CreditAlphanum4 { issuer, .. } | Asset::CreditAlphanum12 { issuer, .. } => {
                Some(issuer)
            }
        }
    }

    /// Whether this is the native asset.
    pub fn is_native(&self) -> bool {
        matches!(self, Asset::Native)
    }
}

fn validate_code(code: &str) -> Result<(), TransactionError> {
    if code.is_empty() || code.len() > 12 {
        return Err(TransactionError::InvalidAsset(format!(
            "asset code {:?} must be 1 to 12 characters",
            code
        )));
    }
    if !code.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(TransactionError::InvalidAsset(format!(
            "asset code {:?} must be alphanumeric",
            code
        )));
    }
    Ok(())
}

/// Write a code into its zero-padded fixed-width field.
///
/// The code must be valid and sized for its variant: 1 to 4 characters
/// for alphanum4, 5 to 12 for alphanum12.
fn encode_code(enc: &mut Encoder, code: &str, min: usize, width: usize) -> Result<(), TransactionError> {
    validate_code(code)?;
    if code.len() < min || code.len() > width {
        return Err(TransactionError::InvalidAsset(format!(
            "asset code {:?} does not fit the {}-{} character variant",
            code, min, width
        )));
    }
    let mut buf = vec![0u8; width];
    buf[..code.len()].copy_from_slice(code.as_bytes());
    enc.write_fixed_opaque(&buf);
    Ok(())
}

/// Read a zero-padded code: characters first, then only zero bytes.
fn decode_code(dec: &mut Decoder<'_>, width: usize) -> Result<String, TransactionError> {
    let raw = dec.read_fixed_opaque(width)?;
    let len = raw.iter().position(|&b| b == 0).unwrap_or(width);
    if raw[len..].iter().any(|&b| b != 0) {
        return Err(TransactionError::MalformedInput(
            "asset code has bytes after its terminator".to_string(),
        ));
    }
    let code = std::str::from_utf8(&raw[..len])
        .map_err(|_| TransactionError::MalformedInput("asset code is not ASCII".to_string()))?;
    validate_code(code).map_err(|e| TransactionError::MalformedInput(e.to_string()))?;
    Ok(code.to_string())
}

impl XdrCodec for Asset {
    fn encode(&self, enc: &mut Encoder) -> Result<(), TransactionError> {
        match self {
            Asset::Native => enc.write_i32(ASSET_TYPE_NATIVE),
            Asset::CreditAlphanum4 { code, issuer } => {
                enc.write_i32(ASSET_TYPE_CREDIT_ALPHANUM4);
                encode_code(enc, code, 1, 4)?;
                issuer.encode(enc)?;
            }
            Asset::CreditAlphanum12 { code, issuer } => {
                enc.write_i32(ASSET_TYPE_CREDIT_ALPHANUM12);
                encode_code(enc, code, 5, 12)?;
                issuer.encode(enc)?;
            }
        }
        Ok(())
    }

    fn decode(dec: &mut Decoder<'_>) -> Result<Self, TransactionError> {
        match dec.read_i32()? {
            ASSET_TYPE_NATIVE => Ok(Asset::Native),
            ASSET_TYPE_CREDIT_ALPHANUM4 => {
                let code = decode_code(dec, 4)?;
                let issuer = PublicKey::decode(dec)?;
                Ok(Asset::CreditAlphanum4 { code, issuer })
            }
            ASSET_TYPE_CREDIT_ALPHANUM12 => {
                let code = decode_code(dec, 12)?;
                if code.len() < 5 {
                    return Err(TransactionError::MalformedInput(format!(
                        "alphanum12 code {:?} is shorter than 5 characters",
                        code
                    )));
                }
                let issuer = PublicKey::decode(dec)?;
                Ok(Asset::CreditAlphanum12 { code, issuer })
            }
            v => Err(unknown_discriminant("asset type", v)),
        }
    }
}

impl FromStr for Asset {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_canonical(s)
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}
