/// Unified error type for all primitives operations.
///
/// Covers errors from StrKey decoding, key handling, signing and XDR byte IO.
#[derive(Debug, thiserror::Error)]
pub enum PrimitivesError {
    #[error("invalid secret seed: {0}")]
    InvalidSecretSeed(String),

    #[error("invalid strkey: {0}")]
    InvalidStrKey(String),

    #[error("strkey checksum mismatch")]
    ChecksumMismatch,

    #[error("key pair has no secret key and cannot sign")]
    MissingSecretKey,

    #[error("invalid key length: expected {expected}, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },

    #[error("unexpected end of data")]
    UnexpectedEof,

    #[error("length {len} exceeds maximum {max}")]
    LengthExceedsMax { len: usize, max: usize },

    #[error("non-zero padding bytes")]
    NonZeroPadding,

    #[error("invalid boolean value {0}")]
    InvalidBool(u32),

    #[error("string is not valid UTF-8")]
    InvalidUtf8,
}
