//! XDR codec for Stellar data types.
//!
//! Every wire type implements [`XdrCodec`]. Encoding goes through an
//! [`Encoder`] and decoding through a [`Decoder`]; both carry the
//! [`CodecLimits`] that bound recursive and repeated structures, and the
//! decoder turns every low-level read failure into `MalformedInput`.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use stellar_primitives::util::{XdrReader, XdrWriter};
use stellar_primitives::{PrimitivesError, PublicKey};

use crate::TransactionError;

/// Maximum claim predicate nesting accepted by the ledger (root is depth 1).
pub const DEFAULT_MAX_PREDICATE_DEPTH: usize = 4;

/// Maximum number of claimants on one claimable balance accepted by the ledger.
pub const DEFAULT_MAX_CLAIMANTS: usize = 10;

/// `PUBLIC_KEY_TYPE_ED25519` discriminant.
const PUBLIC_KEY_TYPE_ED25519: u32 = 0;

/// Limits applied while encoding and decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecLimits {
    /// Deepest claim predicate tree accepted.
    pub max_predicate_depth: usize,
    /// Largest claimant list accepted.
    pub max_claimants: usize,
}

impl Default for CodecLimits {
    fn default() -> Self {
        Self {
            max_predicate_depth: DEFAULT_MAX_PREDICATE_DEPTH,
            max_claimants: DEFAULT_MAX_CLAIMANTS,
        }
    }
}

/// A type with a canonical XDR representation.
pub trait XdrCodec: Sized {
    /// Append this value to the encoder.
    fn encode(&self, enc: &mut Encoder) -> Result<(), TransactionError>;

    /// Read one value from the decoder.
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, TransactionError>;

    /// Encode to bytes with the default limits.
    fn to_xdr_bytes(&self) -> Result<Vec<u8>, TransactionError> {
        let mut enc = Encoder::new();
        self.encode(&mut enc)?;
        Ok(enc.into_bytes())
    }

    /// Decode a complete value from bytes with the default limits.
    ///
    /// Trailing bytes after the value are an error.
    fn from_xdr_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        let mut dec = Decoder::new(bytes);
        let value = Self::decode(&mut dec)?;
        dec.finish()?;
        Ok(value)
    }

    /// Encode to standard base64.
    fn to_xdr_base64(&self) -> Result<String, TransactionError> {
        Ok(BASE64.encode(self.to_xdr_bytes()?))
    }

    /// Decode a complete value from standard base64.
    fn from_xdr_base64(s: &str) -> Result<Self, TransactionError> {
        let bytes = BASE64
            .decode(s.trim())
            .map_err(|e| TransactionError::MalformedInput(format!("invalid base64: {}", e)))?;
        Self::from_xdr_bytes(&bytes)
    }
}

fn malformed(e: PrimitivesError) -> TransactionError {
    TransactionError::MalformedInput(e.to_string())
}

// ---------------------------------------------------------------------------
// Encoder
// ---------------------------------------------------------------------------

/// XDR output buffer plus the limits that encoding must respect.
#[derive(Debug, Default)]
pub struct Encoder {
    writer: XdrWriter,
    limits: CodecLimits,
}

impl Encoder {
    /// Create an encoder with the default limits.
    pub fn new() -> Self {
        Self::with_limits(CodecLimits::default())
    }

    /// Create an encoder with custom limits.
    pub fn with_limits(limits: CodecLimits) -> Self {
        Encoder {
            writer: XdrWriter::with_capacity(256),
            limits,
        }
    }

    /// The limits in force.
    pub fn limits(&self) -> &CodecLimits {
        &self.limits
    }

    /// Append a big-endian u32.
    pub fn write_u32(&mut self, val: u32) {
        self.writer.write_u32(val);
    }

    /// Append a big-endian i32.
    pub fn write_i32(&mut self, val: i32) {
        self.writer.write_i32(val);
    }

    /// Append a big-endian u64.
    pub fn write_u64(&mut self, val: u64) {
        self.writer.write_u64(val);
    }

    /// Append a big-endian i64.
    pub fn write_i64(&mut self, val: i64) {
        self.writer.write_i64(val);
    }

    /// Append an XDR boolean.
    pub fn write_bool(&mut self, val: bool) {
        self.writer.write_bool(val);
    }

    /// Append a fixed-length opaque with padding.
    pub fn write_fixed_opaque(&mut self, bytes: &[u8]) {
        self.writer.write_fixed_opaque(bytes);
    }

    /// Append a variable-length opaque, rejecting bodies longer than `max`.
    pub fn write_var_opaque(&mut self, bytes: &[u8], max: usize) -> Result<(), TransactionError> {
        if bytes.len() > max {
            return Err(TransactionError::MalformedInput(format!(
                "opaque of {} bytes exceeds maximum {}",
                bytes.len(),
                max
            )));
        }
        self.writer.write_var_opaque(bytes);
        Ok(())
    }

    /// Append a string, rejecting strings longer than `max` bytes.
    pub fn write_string(&mut self, s: &str, max: usize) -> Result<(), TransactionError> {
        self.write_var_opaque(s.as_bytes(), max)
    }

    /// Append an array length prefix.
    pub fn write_len(&mut self, len: usize, max: usize) -> Result<(), TransactionError> {
        if len > max {
            return Err(TransactionError::MalformedInput(format!(
                "array of {} elements exceeds maximum {}",
                len, max
            )));
        }
        self.writer.write_u32(len as u32);
        Ok(())
    }

    /// Append a length-prefixed array of values.
    pub fn write_vec<T: XdrCodec>(&mut self, items: &[T], max: usize) -> Result<(), TransactionError> {
        self.write_len(items.len(), max)?;
        for item in items {
            item.encode(self)?;
        }
        Ok(())
    }

    /// Append an XDR optional.
    pub fn write_option<T: XdrCodec>(&mut self, value: &Option<T>) -> Result<(), TransactionError> {
        match value {
            Some(v) => {
                self.write_bool(true);
                v.encode(self)
            }
            None => {
                self.write_bool(false);
                Ok(())
            }
        }
    }

    /// Consume the encoder and return the bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.writer.into_bytes()
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// XDR input cursor plus the limits that decoding must respect.
#[derive(Debug)]
pub struct Decoder<'a> {
    reader: XdrReader<'a>,
    limits: CodecLimits,
}

impl<'a> Decoder<'a> {
    /// Create a decoder with the default limits.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self::with_limits(bytes, CodecLimits::default())
    }

    /// Create a decoder with custom limits.
    pub fn with_limits(bytes: &'a [u8], limits: CodecLimits) -> Self {
        Decoder {
            reader: XdrReader::new(bytes),
            limits,
        }
    }

    /// The limits in force.
    pub fn limits(&self) -> &CodecLimits {
        &self.limits
    }

    /// Read a big-endian u32.
    pub fn read_u32(&mut self) -> Result<u32, TransactionError> {
        self.reader.read_u32().map_err(malformed)
    }

    /// Read a big-endian i32.
    pub fn read_i32(&mut self) -> Result<i32, TransactionError> {
        self.reader.read_i32().map_err(malformed)
    }

    /// Read a big-endian u64.
    pub fn read_u64(&mut self) -> Result<u64, TransactionError> {
        self.reader.read_u64().map_err(malformed)
    }

    /// Read a big-endian i64.
    pub fn read_i64(&mut self) -> Result<i64, TransactionError> {
        self.reader.read_i64().map_err(malformed)
    }

    /// Read an XDR boolean.
    pub fn read_bool(&mut self) -> Result<bool, TransactionError> {
        self.reader.read_bool().map_err(malformed)
    }

    /// Read a fixed-length opaque.
    pub fn read_fixed_opaque(&mut self, n: usize) -> Result<&'a [u8], TransactionError> {
        self.reader.read_fixed_opaque(n).map_err(malformed)
    }

    /// Read a 32-byte opaque.
    pub fn read_array32(&mut self) -> Result<[u8; 32], TransactionError> {
        self.reader.read_array32().map_err(malformed)
    }

    /// Read a variable-length opaque of at most `max` bytes.
    pub fn read_var_opaque(&mut self, max: usize) -> Result<Vec<u8>, TransactionError> {
        self.reader.read_var_opaque(max).map_err(malformed)
    }

    /// Read a string of at most `max` bytes.
    pub fn read_string(&mut self, max: usize) -> Result<String, TransactionError> {
        self.reader.read_string(max).map_err(malformed)
    }

    /// Read a length-prefixed array of values.
    pub fn read_vec<T: XdrCodec>(&mut self, max: usize) -> Result<Vec<T>, TransactionError> {
        let len = self.reader.read_len(max).map_err(malformed)?;
        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            items.push(T::decode(self)?);
        }
        Ok(items)
    }

    /// Read an XDR optional.
    pub fn read_option<T: XdrCodec>(&mut self) -> Result<Option<T>, TransactionError> {
        if self.read_bool()? {
            Ok(Some(T::decode(self)?))
        } else {
            Ok(None)
        }
    }

    /// Read a union discriminant that must be zero (an empty `ext` union).
    pub fn read_empty_ext(&mut self) -> Result<(), TransactionError> {
        match self.read_i32()? {
            0 => Ok(()),
            v => Err(unknown_discriminant("extension", v)),
        }
    }

    /// Check that the whole input has been consumed.
    pub fn finish(&self) -> Result<(), TransactionError> {
        match self.reader.remaining() {
            0 => Ok(()),
            n => Err(TransactionError::MalformedInput(format!(
                "{} trailing bytes after value",
                n
            ))),
        }
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.reader.remaining()
    }
}

/// Error for a union discriminant outside the supported range.
pub(crate) fn unknown_discriminant(union: &str, value: i32) -> TransactionError {
    TransactionError::MalformedInput(format!("unknown {} discriminant {}", union, value))
}

// ---------------------------------------------------------------------------
// Shared leaf types
// ---------------------------------------------------------------------------

impl XdrCodec for PublicKey {
    fn encode(&self, enc: &mut Encoder) -> Result<(), TransactionError> {
        enc.write_u32(PUBLIC_KEY_TYPE_ED25519);
        enc.write_fixed_opaque(self.as_bytes());
        Ok(())
    }

    fn decode(dec: &mut Decoder<'_>) -> Result<Self, TransactionError> {
        match dec.read_i32()? {
            0 => Ok(PublicKey::from_bytes(dec.read_array32()?)),
            v => Err(unknown_discriminant("public key type", v)),
        }
    }
}

impl XdrCodec for u32 {
    fn encode(&self, enc: &mut Encoder) -> Result<(), TransactionError> {
        enc.write_u32(*self);
        Ok(())
    }

    fn decode(dec: &mut Decoder<'_>) -> Result<Self, TransactionError> {
        dec.read_u32()
    }
}

impl XdrCodec for [u8; 32] {
    fn encode(&self, enc: &mut Encoder) -> Result<(), TransactionError> {
        enc.write_fixed_opaque(self);
        Ok(())
    }

    fn decode(dec: &mut Decoder<'_>) -> Result<Self, TransactionError> {
        dec.read_array32()
    }
}
