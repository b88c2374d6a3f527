//! StrKey encoding and decoding.
//!
//! Stellar renders keys and hashes as base32 strings of
//! `version_byte || payload || crc16_xmodem(version_byte || payload)`,
//! with the checksum stored little-endian and no `=` padding. The version
//! byte determines the leading character: `G` for account ids, `S` for
//! secret seeds, `M` for muxed accounts, `T` for pre-authorized transaction
//! hashes and `X` for hash-x signers.

use data_encoding::BASE32_NOPAD;

use crate::PrimitivesError;

/// Kinds of StrKey, each identified by its version byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionByte {
    /// Ed25519 public key, rendered with a leading `G`.
    AccountId,
    /// Ed25519 secret seed, rendered with a leading `S`.
    SecretSeed,
    /// Ed25519 public key plus a 64-bit id, rendered with a leading `M`.
    MuxedAccount,
    /// Pre-authorized transaction hash, rendered with a leading `T`.
    PreAuthTx,
    /// SHA-256 hash-x signer, rendered with a leading `X`.
    Sha256Hash,
}

impl VersionByte {
    /// The raw version byte written in front of the payload.
    pub fn as_byte(&self) -> u8 {
        match self {
            Self::AccountId => 6 << 3,
            Self::SecretSeed => 18 << 3,
            Self::MuxedAccount => 12 << 3,
            Self::PreAuthTx => 19 << 3,
            Self::Sha256Hash => 23 << 3,
        }
    }

    /// Payload length in bytes for this kind of key.
    pub fn payload_len(&self) -> usize {
        match self {
            Self::MuxedAccount => 40,
            _ => 32,
        }
    }
}

/// Encode a payload as a StrKey of the given kind.
///
/// # Arguments
/// * `version` - Kind of key being encoded.
/// * `payload` - Raw key bytes (32 bytes, or 40 for muxed accounts).
///
/// # Returns
/// The StrKey string.
pub fn encode(version: VersionByte, payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(1 + payload.len() + 2);
    data.push(version.as_byte());
    data.extend_from_slice(payload);
    let checksum = crc16_xmodem(&data);
    data.extend_from_slice(&checksum.to_le_bytes());
    BASE32_NOPAD.encode(&data)
}

/// Decode a StrKey, checking its version byte, length and checksum.
///
/// # Arguments
/// * `version` - Kind of key expected.
/// * `s` - The StrKey string.
///
/// # Returns
/// The raw payload bytes, or an error if the string is not a canonical
/// StrKey of the expected kind.
pub fn decode(version: VersionByte, s: &str) -> Result<Vec<u8>, PrimitivesError> {
    let raw = BASE32_NOPAD
        .decode(s.as_bytes())
        .map_err(|e| PrimitivesError::InvalidStrKey(e.to_string()))?;
    if raw.len() != 1 + version.payload_len() + 2 {
        return Err(PrimitivesError::InvalidStrKey(format!(
            "expected {} decoded bytes, got {}",
            1 + version.payload_len() + 2,
            raw.len()
        )));
    }
    if raw[0] != version.as_byte() {
        return Err(PrimitivesError::InvalidStrKey(format!(
            "unexpected version byte {:#04x}",
            raw[0]
        )));
    }

    let (data, checksum) = raw.split_at(raw.len() - 2);
    let expected = crc16_xmodem(data).to_le_bytes();
    if checksum != expected {
        return Err(PrimitivesError::ChecksumMismatch);
    }

    Ok(data[1..].to_vec())
}

/// Check whether a string is a valid StrKey of the given kind.
pub fn is_valid(version: VersionByte, s: &str) -> bool {
    decode(version, s).is_ok()
}

/// CRC-16/XMODEM (polynomial 0x1021, initial value 0).
pub fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ 0x1021;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}
