//! Decoded transaction results, as returned by Horizon in `result_xdr`.
//!
//! Only the operation types this crate can build have typed results; a
//! result for any other operation type is rejected as malformed.

use std::fmt;

use stellar_primitives::PublicKey;

use crate::amount::Price;
use crate::asset::Asset;
use crate::codec::{unknown_discriminant, Decoder, Encoder, XdrCodec};
use crate::operation::{ClaimableBalanceId, OperationType};
use crate::TransactionError;

const UNBOUNDED: usize = u32::MAX as usize;

// ---------------------------------------------------------------------------
// Transaction result codes
// ---------------------------------------------------------------------------

/// Top-level transaction result code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionResultCode {
    FeeBumpInnerSuccess = 1,
    Success = 0,
    Failed = -1,
    TooEarly = -2,
    TooLate = -3,
    MissingOperation = -4,
    BadSeq = -5,
    BadAuth = -6,
    InsufficientBalance = -7,
    NoAccount = -8,
    InsufficientFee = -9,
    BadAuthExtra = -10,
    InternalError = -11,
    NotSupported = -12,
    FeeBumpInnerFailed = -13,
    BadSponsorship = -14,
    BadMinSeqAgeOrGap = -15,
    Malformed = -16,
    SorobanInvalid = -17,
}

impl TransactionResultCode {
    const ALL: [TransactionResultCode; 19] = [
        Self::FeeBumpInnerSuccess,
        Self::Success,
        Self::Failed,
        Self::TooEarly,
        Self::TooLate,
        Self::MissingOperation,
        Self::BadSeq,
        Self::BadAuth,
        Self::InsufficientBalance,
        Self::NoAccount,
        Self::InsufficientFee,
        Self::BadAuthExtra,
        Self::InternalError,
        Self::NotSupported,
        Self::FeeBumpInnerFailed,
        Self::BadSponsorship,
        Self::BadMinSeqAgeOrGap,
        Self::Malformed,
        Self::SorobanInvalid,
    ];

    /// Numeric code.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Look up a code.
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.code() == code)
    }

    /// The name Horizon uses in `extras.result_codes.transaction`.
    pub fn name(self) -> &'static str {
        match self {
            Self::FeeBumpInnerSuccess => "tx_fee_bump_inner_success",
            Self::Success => "tx_success",
            Self::Failed => "tx_failed",
            Self::TooEarly => "tx_too_early",
            Self::TooLate => "tx_too_late",
            Self::MissingOperation => "tx_missing_operation",
            Self::BadSeq => "tx_bad_seq",
            Self::BadAuth => "tx_bad_auth",
            Self::InsufficientBalance => "tx_insufficient_balance",
            Self::NoAccount => "tx_no_source_account",
            Self::InsufficientFee => "tx_insufficient_fee",
            Self::BadAuthExtra => "tx_bad_auth_extra",
            Self::InternalError => "tx_internal_error",
            Self::NotSupported => "tx_not_supported",
            Self::FeeBumpInnerFailed => "tx_fee_bump_inner_failed",
            Self::BadSponsorship => "tx_bad_sponsorship",
            Self::BadMinSeqAgeOrGap => "tx_bad_minseq_age_or_gap",
            Self::Malformed => "tx_malformed",
            Self::SorobanInvalid => "tx_soroban_invalid",
        }
    }
}

impl fmt::Display for TransactionResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Operation results
// ---------------------------------------------------------------------------

/// Result of one operation-specific union: a success payload or a
/// negative failure code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpResult<T> {
    /// Code 0 with the operation's success payload.
    Success(T),
    /// A negative, operation-specific failure code.
    Failure(i32),
}

impl<T> OpResult<T> {
    /// Whether the operation succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, OpResult::Success(_))
    }

    /// The result code; 0 on success.
    pub fn code(&self) -> i32 {
        match self {
            OpResult::Success(_) => 0,
            OpResult::Failure(code) => *code,
        }
    }

    /// The success payload, if any.
    pub fn success(&self) -> Option<&T> {
        match self {
            OpResult::Success(v) => Some(v),
            OpResult::Failure(_) => None,
        }
    }

    fn encode_with(
        &self,
        enc: &mut Encoder,
        write: impl FnOnce(&T, &mut Encoder) -> Result<(), TransactionError>,
    ) -> Result<(), TransactionError> {
        match self {
            OpResult::Success(v) => {
                enc.write_i32(0);
                write(v, enc)
            }
            OpResult::Failure(code) => {
                enc.write_i32(*code);
                Ok(())
            }
        }
    }

    /// Read a result whose failure codes run from -1 down to `lowest`.
    fn decode_with(
        dec: &mut Decoder<'_>,
        union: &str,
        lowest: i32,
        read: impl FnOnce(&mut Decoder<'_>) -> Result<T, TransactionError>,
    ) -> Result<Self, TransactionError> {
        match dec.read_i32()? {
            0 => Ok(OpResult::Success(read(dec)?)),
            code if (lowest..0).contains(&code) => Ok(OpResult::Failure(code)),
            code => Err(unknown_discriminant(union, code)),
        }
    }
}

/// One order-book or pool trade performed by an offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimAtom {
    /// Legacy form with a raw seller key.
    V0 {
        seller_ed25519: [u8; 32],
        offer_id: i64,
        asset_sold: Asset,
        amount_sold: i64,
        asset_bought: Asset,
        amount_bought: i64,
    },
    /// Trade against an order-book offer.
    OrderBook {
        seller_id: PublicKey,
        offer_id: i64,
        asset_sold: Asset,
        amount_sold: i64,
        asset_bought: Asset,
        amount_bought: i64,
    },
    /// Trade against a liquidity pool.
    LiquidityPool {
        liquidity_pool_id: [u8; 32],
        asset_sold: Asset,
        amount_sold: i64,
        asset_bought: Asset,
        amount_bought: i64,
    },
}

impl XdrCodec for ClaimAtom {
    fn encode(&self, enc: &mut Encoder) -> Result<(), TransactionError> {
        let (asset_sold, amount_sold, asset_bought, amount_bought) = match self {
            ClaimAtom::V0 {
                seller_ed25519,
                offer_id,
                asset_sold,
                amount_sold,
                asset_bought,
                amount_bought,
            } => {
                enc.write_i32(0);
                enc.write_fixed_opaque(seller_ed25519);
                enc.write_i64(*offer_id);
                (asset_sold, amount_sold, asset_bought, amount_bought)
            }
            ClaimAtom::OrderBook {
                seller_id,
                offer_id,
                asset_sold,
                amount_sold,
                asset_bought,
                amount_bought,
            } => {
                enc.write_i32(1);
                seller_id.encode(enc)?;
                enc.write_i64(*offer_id);
                (asset_sold, amount_sold, asset_bought, amount_bought)
            }
            ClaimAtom::LiquidityPool {
                liquidity_pool_id,
                asset_sold,
                amount_sold,
                asset_bought,
                amount_bought,
            } => {
                enc.write_i32(2);
                enc.write_fixed_opaque(liquidity_pool_id);
                (asset_sold, amount_sold, asset_bought, amount_bought)
            }
        };
        asset_sold.encode(enc)?;
        enc.write_i64(*amount_sold);
        asset_bought.encode(enc)?;
        enc.write_i64(*amount_bought);
        Ok(())
    }

    fn decode(dec: &mut Decoder<'_>) -> Result<Self, TransactionError> {
        match dec.read_i32()? {
            0 => Ok(ClaimAtom::V0 {
                seller_ed25519: dec.read_array32()?,
                offer_id: dec.read_i64()?,
                asset_sold: Asset::decode(dec)?,
                amount_sold: dec.read_i64()?,
                asset_bought: Asset::decode(dec)?,
                amount_bought: dec.read_i64()?,
            }),
            1 => Ok(ClaimAtom::OrderBook {
                seller_id: PublicKey::decode(dec)?,
                offer_id: dec.read_i64()?,
                asset_sold: Asset::decode(dec)?,
                amount_sold: dec.read_i64()?,
                asset_bought: Asset::decode(dec)?,
                amount_bought: dec.read_i64()?,
            }),
            2 => Ok(ClaimAtom::LiquidityPool {
                liquidity_pool_id: dec.read_array32()?,
                asset_sold: Asset::decode(dec)?,
                amount_sold: dec.read_i64()?,
                asset_bought: Asset::decode(dec)?,
                amount_bought: dec.read_i64()?,
            }),
            v => Err(unknown_discriminant("claim atom type", v)),
        }
    }
}

/// An offer as it rests on the order book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferEntry {
    pub seller_id: PublicKey,
    pub offer_id: i64,
    pub selling: Asset,
    pub buying: Asset,
    pub amount: i64,
    pub price: Price,
    pub flags: u32,
}

impl XdrCodec for OfferEntry {
    fn encode(&self, enc: &mut Encoder) -> Result<(), TransactionError> {
        self.seller_id.encode(enc)?;
        enc.write_i64(self.offer_id);
        self.selling.encode(enc)?;
        self.buying.encode(enc)?;
        enc.write_i64(self.amount);
        self.price.encode(enc)?;
        enc.write_u32(self.flags);
        enc.write_i32(0);
        Ok(())
    }

    fn decode(dec: &mut Decoder<'_>) -> Result<Self, TransactionError> {
        let entry = OfferEntry {
            seller_id: PublicKey::decode(dec)?,
            offer_id: dec.read_i64()?,
            selling: Asset::decode(dec)?,
            buying: Asset::decode(dec)?,
            amount: dec.read_i64()?,
            price: Price::decode(dec)?,
            flags: dec.read_u32()?,
        };
        dec.read_empty_ext()?;
        Ok(entry)
    }
}

/// What happened to the submitted offer after matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManageOfferEffect {
    /// A new offer now rests on the book.
    Created(OfferEntry),
    /// An existing offer was changed.
    Updated(OfferEntry),
    /// The offer was fully taken or removed.
    Deleted,
}

/// Trades made and the resulting offer state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManageOfferSuccess {
    /// Offers (or pools) crossed, in order.
    pub offers_claimed: Vec<ClaimAtom>,
    /// Final state of the submitted offer.
    pub offer: ManageOfferEffect,
}

impl XdrCodec for ManageOfferSuccess {
    fn encode(&self, enc: &mut Encoder) -> Result<(), TransactionError> {
        enc.write_vec(&self.offers_claimed, UNBOUNDED)?;
        match &self.offer {
            ManageOfferEffect::Created(entry) => {
                enc.write_i32(0);
                entry.encode(enc)
            }
            ManageOfferEffect::Updated(entry) => {
                enc.write_i32(1);
                entry.encode(enc)
            }
            ManageOfferEffect::Deleted => {
                enc.write_i32(2);
                Ok(())
            }
        }
    }

    fn decode(dec: &mut Decoder<'_>) -> Result<Self, TransactionError> {
        let offers_claimed = dec.read_vec(UNBOUNDED)?;
        let offer = match dec.read_i32()? {
            0 => ManageOfferEffect::Created(OfferEntry::decode(dec)?),
            1 => ManageOfferEffect::Updated(OfferEntry::decode(dec)?),
            2 => ManageOfferEffect::Deleted,
            v => return Err(unknown_discriminant("manage offer effect", v)),
        };
        Ok(ManageOfferSuccess {
            offers_claimed,
            offer,
        })
    }
}

/// Operation-specific result, keyed by operation type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationInnerResult {
    CreateAccount(OpResult<()>),
    Payment(OpResult<()>),
    ManageSellOffer(OpResult<ManageOfferSuccess>),
    SetOptions(OpResult<()>),
    ChangeTrust(OpResult<()>),
    /// On success, the merged account's former native balance.
    AccountMerge(OpResult<i64>),
    ManageData(OpResult<()>),
    BumpSequence(OpResult<()>),
    ManageBuyOffer(OpResult<ManageOfferSuccess>),
    CreateClaimableBalance(OpResult<ClaimableBalanceId>),
    ClaimClaimableBalance(OpResult<()>),
    SetTrustLineFlags(OpResult<()>),
}

impl OperationInnerResult {
    /// The operation type this result belongs to.
    pub fn operation_type(&self) -> OperationType {
        match self {
            Self::CreateAccount(_) => OperationType::CreateAccount,
            Self::Payment(_) => OperationType::Payment,
            Self::ManageSellOffer(_) => OperationType::ManageSellOffer,
            Self::SetOptions(_) => OperationType::SetOptions,
            Self::ChangeTrust(_) => OperationType::ChangeTrust,
            Self::AccountMerge(_) => OperationType::AccountMerge,
            Self::ManageData(_) => OperationType::ManageData,
            Self::BumpSequence(_) => OperationType::BumpSequence,
            Self::ManageBuyOffer(_) => OperationType::ManageBuyOffer,
            Self::CreateClaimableBalance(_) => OperationType::CreateClaimableBalance,
            Self::ClaimClaimableBalance(_) => OperationType::ClaimClaimableBalance,
            Self::SetTrustLineFlags(_) => OperationType::SetTrustLineFlags,
        }
    }

    /// The operation-specific code; 0 on success.
    pub fn code(&self) -> i32 {
        match self {
            Self::ManageSellOffer(r) | Self::ManageBuyOffer(r) => r.code(),
            Self::AccountMerge(r) => r.code(),
            Self::CreateClaimableBalance(r) => r.code(),
            Self::CreateAccount(r)
            | Self::Payment(r)
            | Self::SetOptions(r)
            | Self::ChangeTrust(r)
            | Self::ManageData(r)
            | Self::BumpSequence(r)
            | Self::ClaimClaimableBalance(r)
            | Self::SetTrustLineFlags(r) => r.code(),
        }
    }
}

fn write_unit(_: &(), _: &mut Encoder) -> Result<(), TransactionError> {
    Ok(())
}

fn read_unit(_: &mut Decoder<'_>) -> Result<(), TransactionError> {
    Ok(())
}

impl XdrCodec for OperationInnerResult {
    fn encode(&self, enc: &mut Encoder) -> Result<(), TransactionError> {
        enc.write_i32(self.operation_type().ordinal());
        match self {
            Self::ManageSellOffer(r) | Self::ManageBuyOffer(r) => r.encode_with(enc, |v, e| v.encode(e)),
            Self::AccountMerge(r) => r.encode_with(enc, |v, e| {
                e.write_i64(*v);
                Ok(())
            }),
            Self::CreateClaimableBalance(r) => r.encode_with(enc, |v, e| v.encode(e)),
            Self::CreateAccount(r)
            | Self::Payment(r)
            | Self::SetOptions(r)
            | Self::ChangeTrust(r)
            | Self::ManageData(r)
            | Self::BumpSequence(r)
            | Self::ClaimClaimableBalance(r)
            | Self::SetTrustLineFlags(r) => r.encode_with(enc, write_unit),
        }
    }

    fn decode(dec: &mut Decoder<'_>) -> Result<Self, TransactionError> {
        let raw = dec.read_i32()?;
        let op_type = OperationType::from_ordinal(raw)
            .ok_or_else(|| unknown_discriminant("operation result type", raw))?;
        let result = match op_type {
            OperationType::CreateAccount => {
                Self::CreateAccount(OpResult::decode_with(dec, "create account result", -4, read_unit)?)
            }
            OperationType::Payment => {
                Self::Payment(OpResult::decode_with(dec, "payment result", -9, read_unit)?)
            }
            OperationType::ManageSellOffer => Self::ManageSellOffer(OpResult::decode_with(
                dec,
                "manage sell offer result",
                -12,
                ManageOfferSuccess::decode,
            )?),
            OperationType::SetOptions => {
                Self::SetOptions(OpResult::decode_with(dec, "set options result", -10, read_unit)?)
            }
            OperationType::ChangeTrust => {
                Self::ChangeTrust(OpResult::decode_with(dec, "change trust result", -8, read_unit)?)
            }
            OperationType::AccountMerge => Self::AccountMerge(OpResult::decode_with(
                dec,
                "account merge result",
                -7,
                |d| d.read_i64(),
            )?),
            OperationType::ManageData => {
                Self::ManageData(OpResult::decode_with(dec, "manage data result", -4, read_unit)?)
            }
            OperationType::BumpSequence => {
                Self::BumpSequence(OpResult::decode_with(dec, "bump sequence result", -1, read_unit)?)
            }
            OperationType::ManageBuyOffer => Self::ManageBuyOffer(OpResult::decode_with(
                dec,
                "manage buy offer result",
                -12,
                ManageOfferSuccess::decode,
            )?),
            OperationType::CreateClaimableBalance => Self::CreateClaimableBalance(OpResult::decode_with(
                dec,
                "create claimable balance result",
                -5,
                ClaimableBalanceId::decode,
            )?),
            OperationType::ClaimClaimableBalance => Self::ClaimClaimableBalance(OpResult::decode_with(
                dec,
                "claim claimable balance result",
                -5,
                read_unit,
            )?),
            OperationType::SetTrustLineFlags => Self::SetTrustLineFlags(OpResult::decode_with(
                dec,
                "set trust line flags result",
                -5,
                read_unit,
            )?),
        };
        Ok(result)
    }
}

/// Result of one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationResult {
    /// The operation ran; see the inner result for its outcome.
    Inner(OperationInnerResult),
    BadAuth,
    NoAccount,
    NotSupported,
    TooManySubentries,
    ExceededWorkLimit,
    TooManySponsoring,
}

impl OperationResult {
    /// Whether the operation ran and succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, OperationResult::Inner(inner) if inner.code() == 0)
    }

    /// Short description used in errors.
    fn describe(&self) -> String {
        match self {
            OperationResult::Inner(inner) => match inner.code() {
                0 => format!("{} success", inner.operation_type()),
                code => format!("{} failure {}", inner.operation_type(), code),
            },
            OperationResult::BadAuth => "op_bad_auth".to_string(),
            OperationResult::NoAccount => "op_no_source_account".to_string(),
            OperationResult::NotSupported => "op_not_supported".to_string(),
            OperationResult::TooManySubentries => "op_too_many_subentries".to_string(),
            OperationResult::ExceededWorkLimit => "op_exceeded_work_limit".to_string(),
            OperationResult::TooManySponsoring => "op_too_many_sponsoring".to_string(),
        }
    }
}

impl XdrCodec for OperationResult {
    fn encode(&self, enc: &mut Encoder) -> Result<(), TransactionError> {
        let code = match self {
            OperationResult::Inner(inner) => {
                enc.write_i32(0);
                return inner.encode(enc);
            }
            OperationResult::BadAuth => -1,
            OperationResult::NoAccount => -2,
            OperationResult::NotSupported => -3,
            OperationResult::TooManySubentries => -4,
            OperationResult::ExceededWorkLimit => -5,
            OperationResult::TooManySponsoring => -6,
        };
        enc.write_i32(code);
        Ok(())
    }

    fn decode(dec: &mut Decoder<'_>) -> Result<Self, TransactionError> {
        match dec.read_i32()? {
            0 => Ok(OperationResult::Inner(OperationInnerResult::decode(dec)?)),
            -1 => Ok(OperationResult::BadAuth),
            -2 => Ok(OperationResult::NoAccount),
            -3 => Ok(OperationResult::NotSupported),
            -4 => Ok(OperationResult::TooManySubentries),
            -5 => Ok(OperationResult::ExceededWorkLimit),
            -6 => Ok(OperationResult::TooManySponsoring),
            v => Err(unknown_discriminant("operation result code", v)),
        }
    }
}

// ---------------------------------------------------------------------------
// Transaction results
// ---------------------------------------------------------------------------

/// Outcome part of a transaction result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionResultBody {
    /// All operations succeeded.
    Success(Vec<OperationResult>),
    /// At least one operation failed.
    Failed(Vec<OperationResult>),
    /// Fee-bump wrapper whose inner transaction succeeded.
    FeeBumpInnerSuccess(InnerTransactionResultPair),
    /// Fee-bump wrapper whose inner transaction failed.
    FeeBumpInnerFailed(InnerTransactionResultPair),
    /// Any other code; the transaction was not applied.
    Rejected(TransactionResultCode),
}

impl TransactionResultBody {
    /// The result code.
    pub fn code(&self) -> TransactionResultCode {
        match self {
            Self::Success(_) => TransactionResultCode::Success,
            Self::Failed(_) => TransactionResultCode::Failed,
            Self::FeeBumpInnerSuccess(_) => TransactionResultCode::FeeBumpInnerSuccess,
            Self::FeeBumpInnerFailed(_) => TransactionResultCode::FeeBumpInnerFailed,
            Self::Rejected(code) => *code,
        }
    }

    /// Operation results, looking through a fee-bump wrapper.
    pub fn operation_results(&self) -> &[OperationResult] {
        match self {
            Self::Success(ops) | Self::Failed(ops) => ops,
            Self::FeeBumpInnerSuccess(pair) | Self::FeeBumpInnerFailed(pair) => {
                pair.result.result.operation_results()
            }
            Self::Rejected(_) => &[],
        }
    }

    fn encode_body(&self, enc: &mut Encoder) -> Result<(), TransactionError> {
        enc.write_i32(self.code().code());
        match self {
            Self::Success(ops) | Self::Failed(ops) => enc.write_vec(ops, UNBOUNDED),
            Self::FeeBumpInnerSuccess(pair) | Self::FeeBumpInnerFailed(pair) => pair.encode(enc),
            Self::Rejected(_) => Ok(()),
        }
    }

    fn decode_body(dec: &mut Decoder<'_>, allow_fee_bump: bool) -> Result<Self, TransactionError> {
        let raw = dec.read_i32()?;
        let code = TransactionResultCode::from_code(raw)
            .ok_or_else(|| unknown_discriminant("transaction result code", raw))?;
        match code {
            TransactionResultCode::Success => Ok(Self::Success(dec.read_vec(UNBOUNDED)?)),
            TransactionResultCode::Failed => Ok(Self::Failed(dec.read_vec(UNBOUNDED)?)),
            TransactionResultCode::FeeBumpInnerSuccess if allow_fee_bump => {
                Ok(Self::FeeBumpInnerSuccess(InnerTransactionResultPair::decode(dec)?))
            }
            TransactionResultCode::FeeBumpInnerFailed if allow_fee_bump => {
                Ok(Self::FeeBumpInnerFailed(InnerTransactionResultPair::decode(dec)?))
            }
            TransactionResultCode::FeeBumpInnerSuccess | TransactionResultCode::FeeBumpInnerFailed => {
                Err(unknown_discriminant("inner transaction result code", raw))
            }
            other => Ok(Self::Rejected(other)),
        }
    }
}

/// Result of the inner transaction of a fee bump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnerTransactionResult {
    /// Fee charged for the inner transaction.
    pub fee_charged: i64,
    /// Inner outcome; never a fee-bump variant.
    pub result: Box<TransactionResultBody>,
}

/// Hash of a fee bump's inner transaction with its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnerTransactionResultPair {
    /// Inner transaction hash.
    pub transaction_hash: [u8; 32],
    /// Inner transaction result.
    pub result: InnerTransactionResult,
}

impl XdrCodec for InnerTransactionResultPair {
    fn encode(&self, enc: &mut Encoder) -> Result<(), TransactionError> {
        enc.write_fixed_opaque(&self.transaction_hash);
        enc.write_i64(self.result.fee_charged);
        self.result.result.encode_body(enc)?;
        enc.write_i32(0);
        Ok(())
    }

    fn decode(dec: &mut Decoder<'_>) -> Result<Self, TransactionError> {
        let transaction_hash = dec.read_array32()?;
        let fee_charged = dec.read_i64()?;
        let result = TransactionResultBody::decode_body(dec, false)?;
        dec.read_empty_ext()?;
        Ok(InnerTransactionResultPair {
            transaction_hash,
            result: InnerTransactionResult {
                fee_charged,
                result: Box::new(result),
            },
        })
    }
}

/// A decoded `TransactionResult`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionResult {
    /// Fee actually charged, in stroops.
    pub fee_charged: i64,
    /// Outcome and operation results.
    pub result: TransactionResultBody,
}

impl TransactionResult {
    /// The top-level result code.
    pub fn code(&self) -> TransactionResultCode {
        self.result.code()
    }

    /// Whether the transaction (or a fee bump's inner transaction) succeeded.
    pub fn is_success(&self) -> bool {
        matches!(
            self.result,
            TransactionResultBody::Success(_) | TransactionResultBody::FeeBumpInnerSuccess(_)
        )
    }

    /// Operation results in operation order.
    pub fn operation_results(&self) -> &[OperationResult] {
        self.result.operation_results()
    }

    /// The result of the operation at `index`.
    ///
    /// # Returns
    /// `IndexOutOfRange` when the transaction has fewer results.
    pub fn result_value_for_operation(&self, index: usize) -> Result<&OperationResult, TransactionError> {
        let results = self.operation_results();
        results.get(index).ok_or(TransactionError::IndexOutOfRange {
            index,
            len: results.len(),
        })
    }

    /// The id of the claimable balance created by the operation at `index`.
    ///
    /// # Returns
    /// `IndexOutOfRange`, or `UnexpectedOperationResultType` when that
    /// operation is not a successful `CreateClaimableBalance`.
    pub fn created_claimable_balance_id(&self, index: usize) -> Result<ClaimableBalanceId, TransactionError> {
        match self.result_value_for_operation(index)? {
            OperationResult::Inner(OperationInnerResult::CreateClaimableBalance(OpResult::Success(id))) => {
                Ok(*id)
            }
            other => Err(TransactionError::UnexpectedOperationResultType {
                expected: "CREATE_CLAIMABLE_BALANCE success",
                found: other.describe(),
            }),
        }
    }
}

impl XdrCodec for TransactionResult {
    fn encode(&self, enc: &mut Encoder) -> Result<(), TransactionError> {
        enc.write_i64(self.fee_charged);
        self.result.encode_body(enc)?;
        enc.write_i32(0);
        Ok(())
    }

    fn decode(dec: &mut Decoder<'_>) -> Result<Self, TransactionError> {
        let fee_charged = dec.read_i64()?;
        let result = TransactionResultBody::decode_body(dec, true)?;
        dec.read_empty_ext()?;
        Ok(TransactionResult {
            fee_charged,
            result,
        })
    }
}
