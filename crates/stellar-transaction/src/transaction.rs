//! Transactions: construction-time state, signing and envelope encoding.
//!
//! A `Transaction` is produced by [`TransactionBuilder`](crate::TransactionBuilder)
//! and stays mutable (operations, memo) only until its first signature.
//! Its identity on a network is the SHA-256 of the signature base, so the
//! same transaction hashes differently on the public network and testnet.

use stellar_primitives::hash::sha256;
use stellar_primitives::{KeyPair, Network};

use crate::account::MuxedAccount;
use crate::codec::{unknown_discriminant, Decoder, Encoder, XdrCodec};
use crate::memo::Memo;
use crate::operation::Operation;
use crate::TransactionError;

/// `ENVELOPE_TYPE_TX` discriminant, also used in the signature base.
pub const ENVELOPE_TYPE_TX: i32 = 2;

/// Maximum operations in one transaction.
pub const MAX_OPERATIONS: usize = 100;

/// Maximum signatures on one envelope.
pub const MAX_SIGNATURES: usize = 20;

/// Longest signature body accepted in a decorated signature.
pub const MAX_SIGNATURE_LEN: usize = 64;

const PRECOND_NONE: i32 = 0;
const PRECOND_TIME: i32 = 1;

/// Validity window of a transaction in unix seconds. Zero means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TimeBounds {
    /// Earliest close time, or 0.
    pub min_time: u64,
    /// Latest close time, or 0 for no upper bound.
    pub max_time: u64,
}

impl TimeBounds {
    /// Create time bounds.
    pub fn new(min_time: u64, max_time: u64) -> Self {
        TimeBounds { min_time, max_time }
    }
}

impl XdrCodec for TimeBounds {
    fn encode(&self, enc: &mut Encoder) -> Result<(), TransactionError> {
        enc.write_u64(self.min_time);
        enc.write_u64(self.max_time);
        Ok(())
    }

    fn decode(dec: &mut Decoder<'_>) -> Result<Self, TransactionError> {
        Ok(TimeBounds {
            min_time: dec.read_u64()?,
            max_time: dec.read_u64()?,
        })
    }
}

/// A signature with the hint that tells verifiers which key made it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DecoratedSignature {
    /// Last four bytes of the signer's public key.
    pub hint: [u8; 4],
    /// Signature bytes, at most 64.
    pub signature: Vec<u8>,
}

impl XdrCodec for DecoratedSignature {
    fn encode(&self, enc: &mut Encoder) -> Result<(), TransactionError> {
        enc.write_fixed_opaque(&self.hint);
        enc.write_var_opaque(&self.signature, MAX_SIGNATURE_LEN)
    }

    fn decode(dec: &mut Decoder<'_>) -> Result<Self, TransactionError> {
        let mut hint = [0u8; 4];
        hint.copy_from_slice(dec.read_fixed_opaque(4)?);
        Ok(DecoratedSignature {
            hint,
            signature: dec.read_var_opaque(MAX_SIGNATURE_LEN)?,
        })
    }
}

/// A transaction and the signatures collected for it.
///
/// # Envelope format
///
/// | Field            | Encoding                               |
/// |------------------|----------------------------------------|
/// | envelope type    | i32, always `ENVELOPE_TYPE_TX`         |
/// | source account   | MuxedAccount                           |
/// | fee              | u32 stroops                            |
/// | sequence number  | i64                                    |
/// | preconditions    | none, or time bounds                   |
/// | memo             | Memo union                             |
/// | operations       | array, at most 100                     |
/// | ext              | i32 0                                  |
/// | signatures       | array, at most 20                      |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    source_account: MuxedAccount,
    fee: u32,
    sequence_number: i64,
    time_bounds: Option<TimeBounds>,
    memo: Memo,
    operations: Vec<Operation>,
    signatures: Vec<DecoratedSignature>,
}

impl Transaction {
    /// Assemble an unsigned transaction. Callers have checked the
    /// operation count and fee.
    pub(crate) fn from_parts(
        source_account: MuxedAccount,
        fee: u32,
        sequence_number: i64,
        time_bounds: Option<TimeBounds>,
        memo: Memo,
        operations: Vec<Operation>,
    ) -> Self {
        Transaction {
            source_account,
            fee,
            sequence_number,
            time_bounds,
            memo,
            operations,
            signatures: Vec::new(),
        }
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    /// The account paying the fee and consuming the sequence number.
    pub fn source_account(&self) -> &MuxedAccount {
        &self.source_account
    }

    /// Total fee in stroops.
    pub fn fee(&self) -> u32 {
        self.fee
    }

    /// Sequence number this transaction consumes.
    pub fn sequence_number(&self) -> i64 {
        self.sequence_number
    }

    /// Validity window, if any.
    pub fn time_bounds(&self) -> Option<&TimeBounds> {
        self.time_bounds.as_ref()
    }

    /// The memo.
    pub fn memo(&self) -> &Memo {
        &self.memo
    }

    /// The operations in order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Signatures collected so far.
    pub fn signatures(&self) -> &[DecoratedSignature] {
        &self.signatures
    }

    /// Whether at least one signature has been added.
    pub fn is_signed(&self) -> bool {
        !self.signatures.is_empty()
    }

    // -----------------------------------------------------------------
    // Mutation before signing
    // -----------------------------------------------------------------

    /// Append an operation, raising the fee by the current per-operation fee.
    ///
    /// # Returns
    /// `AlreadySigned` once a signature exists, `TooManyOperations` past
    /// 100 operations and `InvalidFee` if the new fee overflows.
    pub fn add_operation(&mut self, operation: Operation) -> Result<(), TransactionError> {
        if self.is_signed() {
            return Err(TransactionError::AlreadySigned);
        }
        if self.operations.len() >= MAX_OPERATIONS {
            return Err(TransactionError::TooManyOperations {
                count: self.operations.len() + 1,
                max: MAX_OPERATIONS,
            });
        }
        operation.validate()?;
        let per_op = match self.operations.len() {
            0 => self.fee,
            n => self.fee / n as u32,
        };
        self.fee = self.fee.checked_add(per_op).ok_or_else(|| {
            TransactionError::InvalidFee(format!("fee {} + {} overflows u32", self.fee, per_op))
        })?;
        self.operations.push(operation);
        Ok(())
    }

    /// Replace the memo.
    pub fn set_memo(&mut self, memo: Memo) -> Result<(), TransactionError> {
        if self.is_signed() {
            return Err(TransactionError::AlreadySigned);
        }
        self.memo = memo;
        Ok(())
    }

    // -----------------------------------------------------------------
    // Hashing and signing
    // -----------------------------------------------------------------

    /// Bytes that signers sign:
    /// `network_id ‖ ENVELOPE_TYPE_TX ‖ transaction without signatures`.
    pub fn signature_base(&self, network: &Network) -> Result<Vec<u8>, TransactionError> {
        let mut enc = Encoder::new();
        enc.write_fixed_opaque(&network.network_id());
        enc.write_i32(ENVELOPE_TYPE_TX);
        self.encode_body(&mut enc)?;
        Ok(enc.into_bytes())
    }

    /// Transaction hash on `network`: SHA-256 of the signature base.
    pub fn hash(&self, network: &Network) -> Result<[u8; 32], TransactionError> {
        Ok(sha256(&self.signature_base(network)?))
    }

    /// Transaction hash as lowercase hex, the form Horizon reports.
    pub fn hash_hex(&self, network: &Network) -> Result<String, TransactionError> {
        Ok(hex::encode(self.hash(network)?))
    }

    /// Sign the hash for `network` and append the decorated signature.
    ///
    /// Signing twice with the same key appends two identical signatures;
    /// avoiding that is up to the caller.
    ///
    /// # Returns
    /// `MissingSecretKey` (via `Primitives`) for a public-only key pair.
    pub fn sign(&mut self, signer: &KeyPair, network: &Network) -> Result<(), TransactionError> {
        let hash = self.hash(network)?;
        let signature = signer.sign(&hash)?;
        self.push_signature(DecoratedSignature {
            hint: signer.signature_hint(),
            signature: signature.to_vec(),
        })
    }

    /// Append a signature produced elsewhere (hardware wallet, co-signer).
    pub fn add_signature(&mut self, signature: DecoratedSignature) -> Result<(), TransactionError> {
        if signature.signature.len() > MAX_SIGNATURE_LEN {
            return Err(TransactionError::InvalidOperation(format!(
                "signature of {} bytes exceeds {}",
                signature.signature.len(),
                MAX_SIGNATURE_LEN
            )));
        }
        self.push_signature(signature)
    }

    fn push_signature(&mut self, signature: DecoratedSignature) -> Result<(), TransactionError> {
        if self.signatures.len() >= MAX_SIGNATURES {
            return Err(TransactionError::InvalidOperation(format!(
                "envelope already holds {} signatures",
                MAX_SIGNATURES
            )));
        }
        self.signatures.push(signature);
        Ok(())
    }

    // -----------------------------------------------------------------
    // Envelope encoding
    // -----------------------------------------------------------------

    /// Serialize the signed envelope.
    pub fn to_envelope_xdr(&self) -> Result<Vec<u8>, TransactionError> {
        self.to_xdr_bytes()
    }

    /// Serialize the signed envelope as base64, the form Horizon accepts.
    pub fn to_envelope_xdr_base64(&self) -> Result<String, TransactionError> {
        self.to_xdr_base64()
    }

    /// Parse an envelope. Only `ENVELOPE_TYPE_TX` is accepted.
    pub fn from_envelope_xdr(bytes: &[u8]) -> Result<Self, TransactionError> {
        Self::from_xdr_bytes(bytes)
    }

    /// Parse a base64 envelope.
    pub fn from_envelope_xdr_base64(s: &str) -> Result<Self, TransactionError> {
        Self::from_xdr_base64(s)
    }

    fn encode_body(&self, enc: &mut Encoder) -> Result<(), TransactionError> {
        self.source_account.encode(enc)?;
        enc.write_u32(self.fee);
        enc.write_i64(self.sequence_number);
        match &self.time_bounds {
            Some(tb) => {
                enc.write_i32(PRECOND_TIME);
                tb.encode(enc)?;
            }
            None => enc.write_i32(PRECOND_NONE),
        }
        self.memo.encode(enc)?;
        enc.write_vec(&self.operations, MAX_OPERATIONS)?;
        enc.write_i32(0);
        Ok(())
    }

    fn decode_body(dec: &mut Decoder<'_>) -> Result<Self, TransactionError> {
        let source_account = MuxedAccount::decode(dec)?;
        let fee = dec.read_u32()?;
        let sequence_number = dec.read_i64()?;
        let time_bounds = match dec.read_i32()? {
            PRECOND_NONE => None,
            PRECOND_TIME => Some(TimeBounds::decode(dec)?),
            v => return Err(unknown_discriminant("precondition type", v)),
        };
        let memo = Memo::decode(dec)?;
        let operations: Vec<Operation> = dec.read_vec(MAX_OPERATIONS)?;
        if operations.is_empty() {
            return Err(TransactionError::MalformedInput(
                "transaction without operations".to_string(),
            ));
        }
        dec.read_empty_ext()?;
        Ok(Transaction::from_parts(
            source_account,
            fee,
            sequence_number,
            time_bounds,
            memo,
            operations,
        ))
    }
}

impl XdrCodec for Transaction {
    /// Encodes the full envelope, signatures included.
    fn encode(&self, enc: &mut Encoder) -> Result<(), TransactionError> {
        enc.write_i32(ENVELOPE_TYPE_TX);
        self.encode_body(enc)?;
        enc.write_vec(&self.signatures, MAX_SIGNATURES)
    }

    fn decode(dec: &mut Decoder<'_>) -> Result<Self, TransactionError> {
        match dec.read_i32()? {
            ENVELOPE_TYPE_TX => {
                let mut tx = Self::decode_body(dec)?;
                tx.signatures = dec.read_vec(MAX_SIGNATURES)?;
                Ok(tx)
            }
            v => Err(unknown_discriminant("envelope type", v)),
        }
    }
}
