//! Byte-level XDR reading and writing.
//!
//! XDR (RFC 4506) encodes integers big-endian in 4- or 8-byte words, and
//! pads every opaque or string body with zero bytes to a multiple of four.
//! Variable-length bodies are prefixed with their length as a `u32`.
//! `XdrReader` and `XdrWriter` provide those primitives; the structure of
//! Stellar types is layered on top in `stellar-transaction`.

use crate::PrimitivesError;

/// Number of zero bytes needed to pad `len` to a 4-byte boundary.
pub fn padding_len(len: usize) -> usize {
    (4 - len % 4) % 4
}

// ---------------------------------------------------------------------------
// XdrReader
// ---------------------------------------------------------------------------

/// A cursor-based reader for XDR data.
///
/// Wraps a byte slice and maintains a read position. Every read checks the
/// remaining length first, so a truncated or lying length prefix yields an
/// error rather than a panic or a huge allocation.
#[derive(Debug)]
pub struct XdrReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> XdrReader<'a> {
    /// Create a new reader over the given byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        XdrReader { data, pos: 0 }
    }

    /// Read `n` raw bytes and advance the position.
    ///
    /// # Returns
    /// A byte slice of length `n`, or `UnexpectedEof` if insufficient data remains.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], PrimitivesError> {
        if n > self.remaining() {
            return Err(PrimitivesError::UnexpectedEof);
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Read a big-endian u32.
    pub fn read_u32(&mut self) -> Result<u32, PrimitivesError> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a big-endian i32.
    pub fn read_i32(&mut self) -> Result<i32, PrimitivesError> {
        Ok(self.read_u32()? as i32)
    }

    /// Read a big-endian u64.
    pub fn read_u64(&mut self) -> Result<u64, PrimitivesError> {
        let bytes = self.read_bytes(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(bytes);
        Ok(u64::from_be_bytes(buf))
    }

    /// Read a big-endian i64.
    pub fn read_i64(&mut self) -> Result<i64, PrimitivesError> {
        Ok(self.read_u64()? as i64)
    }

    /// Read an XDR boolean, which must be exactly 0 or 1.
    pub fn read_bool(&mut self) -> Result<bool, PrimitivesError> {
        match self.read_u32()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(PrimitivesError::InvalidBool(other)),
        }
    }

    /// Read a fixed-length opaque of `n` bytes followed by its zero padding.
    pub fn read_fixed_opaque(&mut self, n: usize) -> Result<&'a [u8], PrimitivesError> {
        let body = self.read_bytes(n)?;
        self.read_padding(n)?;
        Ok(body)
    }

    /// Read a fixed 32-byte opaque (hashes, keys).
    pub fn read_array32(&mut self) -> Result<[u8; 32], PrimitivesError> {
        let mut out = [0u8; 32];
        out.copy_from_slice(self.read_fixed_opaque(32)?);
        Ok(out)
    }

    /// Read a length-prefixed variable opaque of at most `max` bytes.
    pub fn read_var_opaque(&mut self, max: usize) -> Result<Vec<u8>, PrimitivesError> {
        let len = self.read_u32()? as usize;
        if len > max {
            return Err(PrimitivesError::LengthExceedsMax { len, max });
        }
        if len > self.remaining() {
            return Err(PrimitivesError::UnexpectedEof);
        }
        Ok(self.read_fixed_opaque(len)?.to_vec())
    }

    /// Read a length-prefixed UTF-8 string of at most `max` bytes.
    pub fn read_string(&mut self, max: usize) -> Result<String, PrimitivesError> {
        let bytes = self.read_var_opaque(max)?;
        String::from_utf8(bytes).map_err(|_| PrimitivesError::InvalidUtf8)
    }

    /// Read an array length prefix, checking it against `max`.
    ///
    /// Each element takes at least four bytes on the wire, so a count that
    /// could not possibly fit in the remaining data is rejected up front.
    pub fn read_len(&mut self, max: usize) -> Result<usize, PrimitivesError> {
        let len = self.read_u32()? as usize;
        if len > max {
            return Err(PrimitivesError::LengthExceedsMax { len, max });
        }
        if len.saturating_mul(4) > self.remaining() {
            return Err(PrimitivesError::UnexpectedEof);
        }
        Ok(len)
    }

    fn read_padding(&mut self, body_len: usize) -> Result<(), PrimitivesError> {
        let padding = self.read_bytes(padding_len(body_len))?;
        if padding.iter().any(|&b| b != 0) {
            return Err(PrimitivesError::NonZeroPadding);
        }
        Ok(())
    }

    /// Return the number of bytes remaining.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

// ---------------------------------------------------------------------------
// XdrWriter
// ---------------------------------------------------------------------------

/// A buffer-based writer for XDR data.
#[derive(Debug, Default)]
pub struct XdrWriter {
    buf: Vec<u8>,
}

impl XdrWriter {
    /// Create a new empty writer.
    pub fn new() -> Self {
        XdrWriter { buf: Vec::new() }
    }

    /// Create a new writer with a pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        XdrWriter {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Append raw bytes with no length prefix or padding.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append a big-endian u32.
    pub fn write_u32(&mut self, val: u32) {
        self.buf.extend_from_slice(&val.to_be_bytes());
    }

    /// Append a big-endian i32.
    pub fn write_i32(&mut self, val: i32) {
        self.buf.extend_from_slice(&val.to_be_bytes());
    }

    /// Append a big-endian u64.
    pub fn write_u64(&mut self, val: u64) {
        self.buf.extend_from_slice(&val.to_be_bytes());
    }

    /// Append a big-endian i64.
    pub fn write_i64(&mut self, val: i64) {
        self.buf.extend_from_slice(&val.to_be_bytes());
    }

    /// Append an XDR boolean.
    pub fn write_bool(&mut self, val: bool) {
        self.write_u32(val as u32);
    }

    /// Append a fixed-length opaque followed by zero padding.
    pub fn write_fixed_opaque(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
        self.buf
            .extend(std::iter::repeat(0u8).take(padding_len(bytes.len())));
    }

    /// Append a length-prefixed variable opaque followed by zero padding.
    pub fn write_var_opaque(&mut self, bytes: &[u8]) {
        self.write_u32(bytes.len() as u32);
        self.write_fixed_opaque(bytes);
    }

    /// Append a length-prefixed string.
    pub fn write_string(&mut self, s: &str) {
        self.write_var_opaque(s.as_bytes());
    }

    /// Consume the writer and return the accumulated bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Return a reference to the current buffer contents.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Return the current length of the buffer.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers_are_big_endian() {
        let mut writer = XdrWriter::new();
        writer.write_u32(0x0102_0304);
        writer.write_i32(-1);
        writer.write_u64(0x0102_0304_0506_0708);
        writer.write_i64(-2);
        assert_eq!(
            hex::encode(writer.as_bytes()),
            "01020304ffffffff0102030405060708fffffffffffffffe"
        );
    }

    #[test]
    fn test_reader_writer_roundtrip() {
        let mut writer = XdrWriter::new();
        writer.write_u32(7);
        writer.write_i64(-42);
        writer.write_bool(true);
        writer.write_string("hello");
        writer.write_fixed_opaque(&[1, 2, 3]);
        writer.write_var_opaque(&[]);

        let data = writer.into_bytes();
        let mut reader = XdrReader::new(&data);
        assert_eq!(reader.read_u32().unwrap(), 7);
        assert_eq!(reader.read_i64().unwrap(), -42);
        assert!(reader.read_bool().unwrap());
        assert_eq!(reader.read_string(28).unwrap(), "hello");
        assert_eq!(reader.read_fixed_opaque(3).unwrap(), &[1, 2, 3]);
        assert_eq!(reader.read_var_opaque(64).unwrap(), Vec::<u8>::new());
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_string_is_padded() {
        let mut writer = XdrWriter::new();
        writer.write_string("abcde");
        assert_eq!(hex::encode(writer.as_bytes()), "000000056162636465000000");
    }

    #[test]
    fn test_reader_eof() {
        let mut reader = XdrReader::new(&[0, 0, 1]);
        assert!(matches!(reader.read_u32(), Err(PrimitivesError::UnexpectedEof)));
    }

    #[test]
    fn test_length_prefix_beyond_buffer() {
        let mut reader = XdrReader::new(&[0, 0, 0, 8, 1, 2, 3, 4]);
        assert!(matches!(
            reader.read_var_opaque(64),
            Err(PrimitivesError::UnexpectedEof)
        ));
    }

    #[test]
    fn test_length_prefix_above_max() {
        let mut reader = XdrReader::new(&[0, 0, 0, 30]);
        assert!(matches!(
            reader.read_var_opaque(28),
            Err(PrimitivesError::LengthExceedsMax { len: 30, max: 28 })
        ));
    }

    #[test]
    fn test_nonzero_padding_rejected() {
        let mut reader = XdrReader::new(&[0, 0, 0, 1, 0x61, 0, 1, 0]);
        assert!(matches!(
            reader.read_string(28),
            Err(PrimitivesError::NonZeroPadding)
        ));
    }

    #[test]
    fn test_invalid_bool_rejected() {
        let mut reader = XdrReader::new(&[0, 0, 0, 2]);
        assert!(matches!(reader.read_bool(), Err(PrimitivesError::InvalidBool(2))));
    }

    #[test]
    fn test_array_len_bounded_by_remaining() {
        let mut reader = XdrReader::new(&[0, 0, 0, 3, 0, 0, 0, 0]);
        assert!(reader.read_len(100).is_err());
    }
}
