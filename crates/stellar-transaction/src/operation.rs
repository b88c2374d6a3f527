//! Operations: the units of work a transaction carries.
//!
//! Each operation has an optional source account (defaulting to the
//! transaction's) and a body. Bodies are encoded as a union keyed by the
//! ledger's operation type ordinal.

use std::fmt;
use std::str::FromStr;

use stellar_primitives::strkey::{self, VersionByte};
use stellar_primitives::PublicKey;

use crate::account::MuxedAccount;
use crate::amount::{check_non_negative, parse_amount, Price};
use crate::asset::Asset;
use crate::codec::{unknown_discriminant, Decoder, Encoder, XdrCodec};
use crate::predicate::Claimant;
use crate::TransactionError;

/// Longest home domain accepted by `SetOptions`.
pub const MAX_HOME_DOMAIN_LEN: usize = 32;

/// Longest data entry name and value accepted by `ManageData`.
pub const MAX_DATA_LEN: usize = 64;

/// Account flag: trustlines to this issuer's assets need authorization.
pub const AUTH_REQUIRED_FLAG: u32 = 0x1;
/// Account flag: the issuer may revoke authorization.
pub const AUTH_REVOCABLE_FLAG: u32 = 0x2;
/// Account flag: no authorization flag can ever change again.
pub const AUTH_IMMUTABLE_FLAG: u32 = 0x4;
/// Account flag: the issuer may claw back its assets.
pub const AUTH_CLAWBACK_ENABLED_FLAG: u32 = 0x8;

/// Trustline flag: the holder is authorized to transact.
pub const TRUSTLINE_AUTHORIZED_FLAG: u32 = 0x1;
/// Trustline flag: the holder may only maintain existing liabilities.
pub const TRUSTLINE_AUTHORIZED_TO_MAINTAIN_LIABILITIES_FLAG: u32 = 0x2;
/// Trustline flag: balances on this trustline can be clawed back.
pub const TRUSTLINE_CLAWBACK_ENABLED_FLAG: u32 = 0x4;

const SIGNER_KEY_TYPE_ED25519: i32 = 0;
const SIGNER_KEY_TYPE_PRE_AUTH_TX: i32 = 1;
const SIGNER_KEY_TYPE_HASH_X: i32 = 2;

const CLAIMABLE_BALANCE_ID_TYPE_V0: i32 = 0;

// ---------------------------------------------------------------------------
// Signer keys
// ---------------------------------------------------------------------------

/// A key that can be added as an account signer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignerKey {
    /// An ed25519 public key (`G…`).
    Ed25519(PublicKey),
    /// Hash of a pre-authorized transaction (`T…`).
    PreAuthTx([u8; 32]),
    /// SHA-256 hash of a secret preimage (`X…`).
    HashX([u8; 32]),
}

impl SignerKey {
    /// Parse a `G…`, `T…` or `X…` StrKey.
    pub fn from_strkey(s: &str) -> Result<Self, TransactionError> {
        let version = match s.as_bytes().first() {
            Some(b'G') => VersionByte::AccountId,
            Some(b'T') => VersionByte::PreAuthTx,
            Some(b'X') => VersionByte::Sha256Hash,
            _ => {
                return Err(TransactionError::MalformedInput(format!(
                    "unsupported signer key {:?}",
                    s
                )))
            }
        };
        let payload = strkey::decode(version, s)?;
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&payload);
        Ok(match version {
            VersionByte::AccountId => SignerKey::Ed25519(PublicKey::from_bytes(bytes)),
            VersionByte::PreAuthTx => SignerKey::PreAuthTx(bytes),
            _ => SignerKey::HashX(bytes),
        })
    }

    /// StrKey form of this key.
    pub fn to_strkey(&self) -> String {
        match self {
            SignerKey::Ed25519(pk) => pk.account_id(),
            SignerKey::PreAuthTx(h) => strkey::encode(VersionByte::PreAuthTx, h),
            SignerKey::HashX(h) => strkey::encode(VersionByte::Sha256Hash, h),
        }
    }
}

impl fmt::Display for SignerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_strkey())
    }
}

impl FromStr for SignerKey {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_strkey(s)
    }
}

impl XdrCodec for SignerKey {
    fn encode(&self, enc: &mut Encoder) -> Result<(), TransactionError> {
        match self {
            SignerKey::Ed25519(pk) => {
                enc.write_i32(SIGNER_KEY_TYPE_ED25519);
                enc.write_fixed_opaque(pk.as_bytes());
            }
            SignerKey::PreAuthTx(h) => {
                enc.write_i32(SIGNER_KEY_TYPE_PRE_AUTH_TX);
                enc.write_fixed_opaque(h);
            }
            SignerKey::HashX(h) => {
                enc.write_i32(SIGNER_KEY_TYPE_HASH_X);
                enc.write_fixed_opaque(h);
            }
        }
        Ok(())
    }

    fn decode(dec: &mut Decoder<'_>) -> Result<Self, TransactionError> {
        match dec.read_i32()? {
            SIGNER_KEY_TYPE_ED25519 => Ok(SignerKey::Ed25519(PublicKey::from_bytes(dec.read_array32()?))),
            SIGNER_KEY_TYPE_PRE_AUTH_TX => Ok(SignerKey::PreAuthTx(dec.read_array32()?)),
            SIGNER_KEY_TYPE_HASH_X => Ok(SignerKey::HashX(dec.read_array32()?)),
            v => Err(unknown_discriminant("signer key type", v)),
        }
    }
}

/// A signer key with its weight. Weight 0 removes the signer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signer {
    /// The key.
    pub key: SignerKey,
    /// Signing weight, 0 to 255.
    pub weight: u32,
}

impl XdrCodec for Signer {
    fn encode(&self, enc: &mut Encoder) -> Result<(), TransactionError> {
        self.key.encode(enc)?;
        enc.write_u32(self.weight);
        Ok(())
    }

    fn decode(dec: &mut Decoder<'_>) -> Result<Self, TransactionError> {
        Ok(Signer {
            key: SignerKey::decode(dec)?,
            weight: dec.read_u32()?,
        })
    }
}

// ---------------------------------------------------------------------------
// Claimable balance id
// ---------------------------------------------------------------------------

/// Identifier of a claimable balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClaimableBalanceId {
    /// Version 0: a SHA-256 hash.
    V0([u8; 32]),
}

impl ClaimableBalanceId {
    /// Parse the hex form used by Horizon: the 4-byte type followed by the
    /// hash (72 hex chars). A bare 64-char hash is read as version 0.
    pub fn from_hex(s: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(s.trim())
            .map_err(|e| TransactionError::MalformedInput(format!("balance id: {}", e)))?;
        let hash = match bytes.len() {
            32 => &bytes[..],
            36 if bytes[..4] == [0, 0, 0, 0] => &bytes[4..],
            _ => {
                return Err(TransactionError::MalformedInput(format!(
                    "balance id {:?} is not a v0 hash",
                    s
                )))
            }
        };
        let mut out = [0u8; 32];
        out.copy_from_slice(hash);
        Ok(ClaimableBalanceId::V0(out))
    }

    /// Hex form with the type prefix, as Horizon reports it.
    pub fn to_hex(&self) -> String {
        match self {
            ClaimableBalanceId::V0(h) => format!("00000000{}", hex::encode(h)),
        }
    }

    /// The underlying hash.
    pub fn hash(&self) -> &[u8; 32] {
        match self {
            ClaimableBalanceId::V0(h) => h,
        }
    }
}

impl fmt::Display for ClaimableBalanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ClaimableBalanceId {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl XdrCodec for ClaimableBalanceId {
    fn encode(&self, enc: &mut Encoder) -> Result<(), TransactionError> {
        match self {
            ClaimableBalanceId::V0(h) => {
                enc.write_i32(CLAIMABLE_BALANCE_ID_TYPE_V0);
                enc.write_fixed_opaque(h);
            }
        }
        Ok(())
    }

    fn decode(dec: &mut Decoder<'_>) -> Result<Self, TransactionError> {
        match dec.read_i32()? {
            CLAIMABLE_BALANCE_ID_TYPE_V0 => Ok(ClaimableBalanceId::V0(dec.read_array32()?)),
            v => Err(unknown_discriminant("claimable balance id type", v)),
        }
    }
}

// ---------------------------------------------------------------------------
// Operation bodies
// ---------------------------------------------------------------------------

/// Create and fund a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAccountOp {
    /// Account to create.
    pub destination: PublicKey,
    /// Initial native balance in stroops.
    pub starting_balance: i64,
}

/// Send an amount of an asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentOp {
    /// Receiving account.
    pub destination: MuxedAccount,
    /// Asset to send.
    pub asset: Asset,
    /// Amount in stroops.
    pub amount: i64,
}

/// Create, update or delete an offer to sell a fixed amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManageSellOfferOp {
    /// Asset offered.
    pub selling: Asset,
    /// Asset wanted.
    pub buying: Asset,
    /// Amount of `selling` offered; 0 deletes the offer.
    pub amount: i64,
    /// Price of one unit of `selling` in terms of `buying`.
    pub price: Price,
    /// 0 for a new offer, otherwise the offer to change.
    pub offer_id: i64,
}

/// Create, update or delete an offer to buy a fixed amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManageBuyOfferOp {
    /// Asset offered.
    pub selling: Asset,
    /// Asset wanted.
    pub buying: Asset,
    /// Amount of `buying` wanted; 0 deletes the offer.
    pub buy_amount: i64,
    /// Price of one unit of `buying` in terms of `selling`.
    pub price: Price,
    /// 0 for a new offer, otherwise the offer to change.
    pub offer_id: i64,
}

/// Change account settings. Every field is optional; unset fields are left
/// untouched on the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetOptionsOp {
    /// Inflation destination.
    pub inflation_dest: Option<PublicKey>,
    /// Account flags to clear.
    pub clear_flags: Option<u32>,
    /// Account flags to set.
    pub set_flags: Option<u32>,
    /// Weight of the master key.
    pub master_weight: Option<u32>,
    /// Low threshold.
    pub low_threshold: Option<u32>,
    /// Medium threshold.
    pub med_threshold: Option<u32>,
    /// High threshold.
    pub high_threshold: Option<u32>,
    /// Home domain, at most 32 bytes.
    pub home_domain: Option<String>,
    /// Signer to add, update or (weight 0) remove.
    pub signer: Option<Signer>,
}

/// Create, update or remove a trustline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeTrustOp {
    /// Asset to trust.
    pub line: Asset,
    /// Trust limit in stroops; 0 removes the trustline.
    pub limit: i64,
}

/// Set, modify or delete a data entry on the source account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManageDataOp {
    /// Entry name, 1 to 64 bytes.
    pub data_name: String,
    /// Entry value, at most 64 bytes; `None` deletes the entry.
    pub data_value: Option<Vec<u8>>,
}

/// Raise the source account's sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BumpSequenceOp {
    /// New sequence number.
    pub bump_to: i64,
}

/// Lock an amount in a claimable balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateClaimableBalanceOp {
    /// Asset locked.
    pub asset: Asset,
    /// Amount in stroops.
    pub amount: i64,
    /// Who may claim, in order.
    pub claimants: Vec<Claimant>,
}

/// Claim a claimable balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimClaimableBalanceOp {
    /// The balance to claim.
    pub balance_id: ClaimableBalanceId,
}

/// Change the authorization flags of someone's trustline to an asset this
/// source account issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetTrustLineFlagsOp {
    /// Holder of the trustline.
    pub trustor: PublicKey,
    /// The issued asset.
    pub asset: Asset,
    /// Trustline flags to clear.
    pub clear_flags: u32,
    /// Trustline flags to set.
    pub set_flags: u32,
}

/// Operation type with its ledger ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationType {
    CreateAccount = 0,
    Payment = 1,
    ManageSellOffer = 3,
    SetOptions = 5,
    ChangeTrust = 6,
    AccountMerge = 8,
    ManageData = 10,
    BumpSequence = 11,
    ManageBuyOffer = 12,
    CreateClaimableBalance = 14,
    ClaimClaimableBalance = 15,
    SetTrustLineFlags = 21,
}

impl OperationType {
    const ALL: [OperationType; 12] = [
        OperationType::CreateAccount,
        OperationType::Payment,
        OperationType::ManageSellOffer,
        OperationType::SetOptions,
        OperationType::ChangeTrust,
        OperationType::AccountMerge,
        OperationType::ManageData,
        OperationType::BumpSequence,
        OperationType::ManageBuyOffer,
        OperationType::CreateClaimableBalance,
        OperationType::ClaimClaimableBalance,
        OperationType::SetTrustLineFlags,
    ];

    /// The ledger ordinal.
    pub fn ordinal(self) -> i32 {
        self as i32
    }

    /// Look up a supported type by ordinal.
    pub fn from_ordinal(v: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.ordinal() == v)
    }

    /// The upper snake case name (`PAYMENT`, `CREATE_CLAIMABLE_BALANCE`, ...).
    pub fn name(self) -> &'static str {
        match self {
            OperationType::CreateAccount => "CREATE_ACCOUNT",
            OperationType::Payment => "PAYMENT",
            OperationType::ManageSellOffer => "MANAGE_SELL_OFFER",
            OperationType::SetOptions => "SET_OPTIONS",
            OperationType::ChangeTrust => "CHANGE_TRUST",
            OperationType::AccountMerge => "ACCOUNT_MERGE",
            OperationType::ManageData => "MANAGE_DATA",
            OperationType::BumpSequence => "BUMP_SEQUENCE",
            OperationType::ManageBuyOffer => "MANAGE_BUY_OFFER",
            OperationType::CreateClaimableBalance => "CREATE_CLAIMABLE_BALANCE",
            OperationType::ClaimClaimableBalance => "CLAIM_CLAIMABLE_BALANCE",
            OperationType::SetTrustLineFlags => "SET_TRUST_LINE_FLAGS",
        }
    }

    /// Look up a supported type by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.name() == name)
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The body of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationBody {
    CreateAccount(CreateAccountOp),
    Payment(PaymentOp),
    ManageSellOffer(ManageSellOfferOp),
    SetOptions(SetOptionsOp),
    ChangeTrust(ChangeTrustOp),
    /// Merge the source account into the destination.
    AccountMerge(MuxedAccount),
    ManageData(ManageDataOp),
    BumpSequence(BumpSequenceOp),
    ManageBuyOffer(ManageBuyOfferOp),
    CreateClaimableBalance(CreateClaimableBalanceOp),
    ClaimClaimableBalance(ClaimClaimableBalanceOp),
    SetTrustLineFlags(SetTrustLineFlagsOp),
}

impl OperationBody {
    /// Type of this body.
    pub fn operation_type(&self) -> OperationType {
        match self {
            OperationBody::CreateAccount(_) => OperationType::CreateAccount,
            OperationBody::Payment(_) => OperationType::Payment,
            OperationBody::ManageSellOffer(_) => OperationType::ManageSellOffer,
            OperationBody::SetOptions(_) => OperationType::SetOptions,
            OperationBody::ChangeTrust(_) => OperationType::ChangeTrust,
            OperationBody::AccountMerge(_) => OperationType::AccountMerge,
            OperationBody::ManageData(_) => OperationType::ManageData,
            OperationBody::BumpSequence(_) => OperationType::BumpSequence,
            OperationBody::ManageBuyOffer(_) => OperationType::ManageBuyOffer,
            OperationBody::CreateClaimableBalance(_) => OperationType::CreateClaimableBalance,
            OperationBody::ClaimClaimableBalance(_) => OperationType::ClaimClaimableBalance,
            OperationBody::SetTrustLineFlags(_) => OperationType::SetTrustLineFlags,
        }
    }

    /// Check structural constraints that the wire format cannot express.
    pub fn validate(&self) -> Result<(), TransactionError> {
        match self {
            OperationBody::CreateAccount(op) => check_non_negative("starting_balance", op.starting_balance),
            OperationBody::Payment(op) => check_non_negative("amount", op.amount),
            OperationBody::ManageSellOffer(op) => {
                check_non_negative("amount", op.amount)?;
                check_price(&op.price)?;
                check_non_negative("offer_id", op.offer_id)
            }
            OperationBody::ManageBuyOffer(op) => {
                check_non_negative("buy_amount", op.buy_amount)?;
                check_price(&op.price)?;
                check_non_negative("offer_id", op.offer_id)
            }
            OperationBody::SetOptions(op) => {
                let weights = [
                    ("master_weight", op.master_weight),
                    ("low_threshold", op.low_threshold),
                    ("med_threshold", op.med_threshold),
                    ("high_threshold", op.high_threshold),
                    ("signer weight", op.signer.map(|s| s.weight)),
                ];
                for (field, value) in weights {
                    if let Some(v) = value {
                        if v > 255 {
                            return Err(TransactionError::InvalidOperation(format!(
                                "{} {} exceeds 255",
                                field, v
                            )));
                        }
                    }
                }
                if let Some(domain) = &op.home_domain {
                    if domain.len() > MAX_HOME_DOMAIN_LEN {
                        return Err(TransactionError::InvalidOperation(format!(
                            "home domain is {} bytes, maximum is {}",
                            domain.len(),
                            MAX_HOME_DOMAIN_LEN
                        )));
                    }
                }
                Ok(())
            }
            OperationBody::ChangeTrust(op) => {
                if op.line.is_native() {
                    return Err(TransactionError::InvalidAsset(
                        "cannot change trust for the native asset".to_string(),
                    ));
                }
                check_non_negative("limit", op.limit)
            }
            OperationBody::AccountMerge(_) | OperationBody::ClaimClaimableBalance(_) => Ok(()),
            OperationBody::ManageData(op) => {
                if op.data_name.is_empty() || op.data_name.len() > MAX_DATA_LEN {
                    return Err(TransactionError::InvalidOperation(format!(
                        "data name must be 1 to {} bytes",
                        MAX_DATA_LEN
                    )));
                }
                match &op.data_value {
                    Some(v) if v.len() > MAX_DATA_LEN => Err(TransactionError::InvalidOperation(
                        format!("data value must be at most {} bytes", MAX_DATA_LEN),
                    )),
                    _ => Ok(()),
                }
            }
            OperationBody::BumpSequence(op) => check_non_negative("bump_to", op.bump_to),
            OperationBody::CreateClaimableBalance(op) => {
                check_non_negative("amount", op.amount)?;
                if op.claimants.is_empty() {
                    return Err(TransactionError::EmptyClaimantList);
                }
                Ok(())
            }
            OperationBody::SetTrustLineFlags(op) => {
                if op.asset.is_native() {
                    return Err(TransactionError::InvalidAsset(
                        "native asset has no trustline flags".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }
}

fn check_price(price: &Price) -> Result<(), TransactionError> {
    if price.n <= 0 || price.d <= 0 {
        return Err(TransactionError::InvalidPrice(format!(
            "{} is not a positive fraction",
            price
        )));
    }
    Ok(())
}

fn encode_claimants(enc: &mut Encoder, claimants: &[Claimant]) -> Result<(), TransactionError> {
    let max = enc.limits().max_claimants;
    if claimants.is_empty() {
        return Err(TransactionError::EmptyClaimantList);
    }
    if claimants.len() > max {
        return Err(TransactionError::TooManyClaimants {
            count: claimants.len(),
            max,
        });
    }
    enc.write_vec(claimants, max)
}

fn decode_claimants(dec: &mut Decoder<'_>) -> Result<Vec<Claimant>, TransactionError> {
    let max = dec.limits().max_claimants;
    let claimants: Vec<Claimant> = dec.read_vec(max)?;
    if claimants.is_empty() {
        return Err(TransactionError::MalformedInput(
            "claimable balance without claimants".to_string(),
        ));
    }
    Ok(claimants)
}

impl XdrCodec for OperationBody {
    fn encode(&self, enc: &mut Encoder) -> Result<(), TransactionError> {
        enc.write_i32(self.operation_type().ordinal());
        match self {
            OperationBody::CreateAccount(op) => {
                op.destination.encode(enc)?;
                enc.write_i64(op.starting_balance);
            }
            OperationBody::Payment(op) => {
                op.destination.encode(enc)?;
                op.asset.encode(enc)?;
                enc.write_i64(op.amount);
            }
            OperationBody::ManageSellOffer(op) => {
                op.selling.encode(enc)?;
                op.buying.encode(enc)?;
                enc.write_i64(op.amount);
                op.price.encode(enc)?;
                enc.write_i64(op.offer_id);
            }
            OperationBody::SetOptions(op) => {
                enc.write_option(&op.inflation_dest)?;
                enc.write_option(&op.clear_flags)?;
                enc.write_option(&op.set_flags)?;
                enc.write_option(&op.master_weight)?;
                enc.write_option(&op.low_threshold)?;
                enc.write_option(&op.med_threshold)?;
                enc.write_option(&op.high_threshold)?;
                match &op.home_domain {
                    Some(domain) => {
                        enc.write_bool(true);
                        enc.write_string(domain, MAX_HOME_DOMAIN_LEN)?;
                    }
                    None => enc.write_bool(false),
                }
                enc.write_option(&op.signer)?;
            }
            OperationBody::ChangeTrust(op) => {
                op.line.encode(enc)?;
                enc.write_i64(op.limit);
            }
            OperationBody::AccountMerge(destination) => destination.encode(enc)?,
            OperationBody::ManageData(op) => {
                enc.write_string(&op.data_name, MAX_DATA_LEN)?;
                match &op.data_value {
                    Some(value) => {
                        enc.write_bool(true);
                        enc.write_var_opaque(value, MAX_DATA_LEN)?;
                    }
                    None => enc.write_bool(false),
                }
            }
            OperationBody::BumpSequence(op) => enc.write_i64(op.bump_to),
            OperationBody::ManageBuyOffer(op) => {
                op.selling.encode(enc)?;
                op.buying.encode(enc)?;
                enc.write_i64(op.buy_amount);
                op.price.encode(enc)?;
                enc.write_i64(op.offer_id);
            }
            OperationBody::CreateClaimableBalance(op) => {
                op.asset.encode(enc)?;
                enc.write_i64(op.amount);
                encode_claimants(enc, &op.claimants)?;
            }
            OperationBody::ClaimClaimableBalance(op) => op.balance_id.encode(enc)?,
            OperationBody::SetTrustLineFlags(op) => {
                op.trustor.encode(enc)?;
                op.asset.encode(enc)?;
                enc.write_u32(op.clear_flags);
                enc.write_u32(op.set_flags);
            }
        }
        Ok(())
    }

    fn decode(dec: &mut Decoder<'_>) -> Result<Self, TransactionError> {
        let raw = dec.read_i32()?;
        let op_type = OperationType::from_ordinal(raw)
            .ok_or_else(|| unknown_discriminant("operation type", raw))?;
        let body = match op_type {
            OperationType::CreateAccount => OperationBody::CreateAccount(CreateAccountOp {
                destination: PublicKey::decode(dec)?,
                starting_balance: dec.read_i64()?,
            }),
            OperationType::Payment => OperationBody::Payment(PaymentOp {
                destination: MuxedAccount::decode(dec)?,
                asset: Asset::decode(dec)?,
                amount: dec.read_i64()?,
            }),
            OperationType::ManageSellOffer => OperationBody::ManageSellOffer(ManageSellOfferOp {
                selling: Asset::decode(dec)?,
                buying: Asset::decode(dec)?,
                amount: dec.read_i64()?,
                price: Price::decode(dec)?,
                offer_id: dec.read_i64()?,
            }),
            OperationType::SetOptions => OperationBody::SetOptions(SetOptionsOp {
                inflation_dest: dec.read_option()?,
                clear_flags: dec.read_option()?,
                set_flags: dec.read_option()?,
                master_weight: dec.read_option()?,
                low_threshold: dec.read_option()?,
                med_threshold: dec.read_option()?,
                high_threshold: dec.read_option()?,
                home_domain: if dec.read_bool()? {
                    Some(dec.read_string(MAX_HOME_DOMAIN_LEN)?)
                } else {
                    None
                },
                signer: dec.read_option()?,
            }),
            OperationType::ChangeTrust => OperationBody::ChangeTrust(ChangeTrustOp {
                line: Asset::decode(dec)?,
                limit: dec.read_i64()?,
            }),
            OperationType::AccountMerge => OperationBody::AccountMerge(MuxedAccount::decode(dec)?),
            OperationType::ManageData => OperationBody::ManageData(ManageDataOp {
                data_name: dec.read_string(MAX_DATA_LEN)?,
                data_value: if dec.read_bool()? {
                    Some(dec.read_var_opaque(MAX_DATA_LEN)?)
                } else {
                    None
                },
            }),
            OperationType::BumpSequence => OperationBody::BumpSequence(BumpSequenceOp {
                bump_to: dec.read_i64()?,
            }),
            OperationType::ManageBuyOffer => OperationBody::ManageBuyOffer(ManageBuyOfferOp {
                selling: Asset::decode(dec)?,
                buying: Asset::decode(dec)?,
                buy_amount: dec.read_i64()?,
                price: Price::decode(dec)?,
                offer_id: dec.read_i64()?,
            }),
            OperationType::CreateClaimableBalance => {
                OperationBody::CreateClaimableBalance(CreateClaimableBalanceOp {
                    asset: Asset::decode(dec)?,
                    amount: dec.read_i64()?,
                    claimants: decode_claimants(dec)?,
                })
            }
            OperationType::ClaimClaimableBalance => {
                OperationBody::ClaimClaimableBalance(ClaimClaimableBalanceOp {
                    balance_id: ClaimableBalanceId::decode(dec)?,
                })
            }
            OperationType::SetTrustLineFlags => OperationBody::SetTrustLineFlags(SetTrustLineFlagsOp {
                trustor: PublicKey::decode(dec)?,
                asset: Asset::decode(dec)?,
                clear_flags: dec.read_u32()?,
                set_flags: dec.read_u32()?,
            }),
        };
        Ok(body)
    }
}

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// One operation of a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Account the operation acts for; `None` uses the transaction source.
    pub source_account: Option<MuxedAccount>,
    /// What the operation does.
    pub body: OperationBody,
}

impl Operation {
    /// Wrap a body with no explicit source account.
    pub fn new(body: OperationBody) -> Self {
        Operation {
            source_account: None,
            body,
        }
    }

    /// Set the operation's source account.
    pub fn with_source_account(mut self, source: impl Into<MuxedAccount>) -> Self {
        self.source_account = Some(source.into());
        self
    }

    /// Type of the body.
    pub fn operation_type(&self) -> OperationType {
        self.body.operation_type()
    }

    /// Check the body's structural constraints.
    pub fn validate(&self) -> Result<(), TransactionError> {
        self.body.validate()
    }

    fn validated(body: OperationBody) -> Result<Self, TransactionError> {
        body.validate()?;
        Ok(Self::new(body))
    }

    /// Create and fund `destination` with a decimal starting balance.
    pub fn create_account(destination: PublicKey, starting_balance: &str) -> Result<Self, TransactionError> {
        Self::validated(OperationBody::CreateAccount(CreateAccountOp {
            destination,
            starting_balance: parse_amount(starting_balance)?,
        }))
    }

    /// Pay a decimal `amount` of `asset` to `destination`.
    pub fn payment(
        destination: impl Into<MuxedAccount>,
        asset: Asset,
        amount: &str,
    ) -> Result<Self, TransactionError> {
        Self::validated(OperationBody::Payment(PaymentOp {
            destination: destination.into(),
            asset,
            amount: parse_amount(amount)?,
        }))
    }

    /// Offer to sell `amount` of `selling` at `price`.
    pub fn manage_sell_offer(
        selling: Asset,
        buying: Asset,
        amount: &str,
        price: Price,
        offer_id: i64,
    ) -> Result<Self, TransactionError> {
        Self::validated(OperationBody::ManageSellOffer(ManageSellOfferOp {
            selling,
            buying,
            amount: parse_amount(amount)?,
            price,
            offer_id,
        }))
    }

    /// Offer to buy `buy_amount` of `buying` at `price`.
    pub fn manage_buy_offer(
        selling: Asset,
        buying: Asset,
        buy_amount: &str,
        price: Price,
        offer_id: i64,
    ) -> Result<Self, TransactionError> {
        Self::validated(OperationBody::ManageBuyOffer(ManageBuyOfferOp {
            selling,
            buying,
            buy_amount: parse_amount(buy_amount)?,
            price,
            offer_id,
        }))
    }

    /// Change account settings.
    pub fn set_options(op: SetOptionsOp) -> Result<Self, TransactionError> {
        Self::validated(OperationBody::SetOptions(op))
    }

    /// Trust `asset` up to `limit`; `None` trusts the maximum amount.
    pub fn change_trust(asset: Asset, limit: Option<&str>) -> Result<Self, TransactionError> {
        let limit = match limit {
            Some(l) => parse_amount(l)?,
            None => i64::MAX,
        };
        Self::validated(OperationBody::ChangeTrust(ChangeTrustOp { line: asset, limit }))
    }

    /// Merge the source account into `destination`.
    pub fn account_merge(destination: impl Into<MuxedAccount>) -> Self {
        Self::new(OperationBody::AccountMerge(destination.into()))
    }

    /// Set (`Some`) or delete (`None`) a data entry.
    pub fn manage_data(name: &str, value: Option<&[u8]>) -> Result<Self, TransactionError> {
        Self::validated(OperationBody::ManageData(ManageDataOp {
            data_name: name.to_string(),
            data_value: value.map(|v| v.to_vec()),
        }))
    }

    /// Bump the source account's sequence number to `bump_to`.
    pub fn bump_sequence(bump_to: i64) -> Result<Self, TransactionError> {
        Self::validated(OperationBody::BumpSequence(BumpSequenceOp { bump_to }))
    }

    /// Lock a decimal `amount` of `asset` for the given claimants.
    pub fn create_claimable_balance(
        asset: Asset,
        amount: &str,
        claimants: Vec<Claimant>,
    ) -> Result<Self, TransactionError> {
        Self::validated(OperationBody::CreateClaimableBalance(CreateClaimableBalanceOp {
            asset,
            amount: parse_amount(amount)?,
            claimants,
        }))
    }

    /// Claim the balance `balance_id`.
    pub fn claim_claimable_balance(balance_id: ClaimableBalanceId) -> Self {
        Self::new(OperationBody::ClaimClaimableBalance(ClaimClaimableBalanceOp { balance_id }))
    }

    /// Change trustline flags on `trustor`'s trustline to `asset`.
    pub fn set_trust_line_flags(
        trustor: PublicKey,
        asset: Asset,
        clear_flags: u32,
        set_flags: u32,
    ) -> Result<Self, TransactionError> {
        Self::validated(OperationBody::SetTrustLineFlags(SetTrustLineFlagsOp {
            trustor,
            asset,
            clear_flags,
            set_flags,
        }))
    }
}

impl XdrCodec for Operation {
    fn encode(&self, enc: &mut Encoder) -> Result<(), TransactionError> {
        enc.write_option(&self.source_account)?;
        self.body.encode(enc)
    }

    fn decode(dec: &mut Decoder<'_>) -> Result<Self, TransactionError> {
        Ok(Operation {
            source_account: dec.read_option()?,
            body: OperationBody::decode(dec)?,
        })
    }
}
