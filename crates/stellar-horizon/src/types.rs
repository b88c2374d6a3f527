//! Horizon data types: configuration, submission results and account records.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use stellar_transaction::operation::{
    AUTH_CLAWBACK_ENABLED_FLAG, AUTH_IMMUTABLE_FLAG, AUTH_REQUIRED_FLAG, AUTH_REVOCABLE_FLAG,
};
use stellar_transaction::result::OperationResult;
use stellar_transaction::{Account, ClaimableBalanceId, TransactionError, TransactionResult, XdrCodec};

use crate::error::HorizonError;

/// Public testnet Horizon.
pub const TESTNET_HORIZON_URL: &str = "https://horizon-testnet.stellar.org";

/// Public network Horizon run by SDF.
pub const PUBLIC_HORIZON_URL: &str = "https://horizon.stellar.org";

/// Configuration for a [`HorizonClient`](crate::HorizonClient).
#[derive(Debug, Clone)]
pub struct HorizonConfig {
    /// Base URL of the Horizon server, without a trailing slash.
    pub base_url: String,
    /// Timeout applied to every request.
    pub timeout: Duration,
    /// Sent as `X-Client-Name` when set.
    pub client_name: Option<String>,
    /// Sent as `X-Client-Version` when set.
    pub client_version: Option<String>,
}

impl HorizonConfig {
    /// Configuration for the public testnet Horizon.
    pub fn testnet() -> Self {
        Self::default()
    }

    /// Configuration for the public network Horizon.
    pub fn public() -> Self {
        Self {
            base_url: PUBLIC_HORIZON_URL.to_string(),
            ..Self::default()
        }
    }
}

impl Default for HorizonConfig {
    fn default() -> Self {
        Self {
            base_url: TESTNET_HORIZON_URL.to_string(),
            timeout: Duration::from_secs(30),
            client_name: Some("stellar-sdk-rust".to_string()),
            client_version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// Body of a successful `POST /transactions` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct SubmitTransactionBody {
    pub hash: String,
    #[serde(default)]
    pub ledger: Option<u32>,
    pub envelope_xdr: String,
    pub result_xdr: String,
    #[serde(default)]
    pub result_meta_xdr: Option<String>,
}

/// A transaction Horizon accepted into a ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTransactionResponse {
    /// Transaction hash (hex).
    pub hash: String,
    /// Ledger the transaction was included in.
    pub ledger: Option<u32>,
    /// Envelope as submitted (base64).
    pub envelope_xdr: String,
    /// Raw result (base64).
    pub result_xdr: String,
    /// Ledger changes made by the transaction (base64), when reported.
    pub result_meta_xdr: Option<String>,
    /// `result_xdr`, decoded.
    pub result: TransactionResult,
}

impl SubmitTransactionResponse {
    pub(crate) fn from_body(body: SubmitTransactionBody) -> Result<Self, HorizonError> {
        let result = TransactionResult::from_xdr_base64(&body.result_xdr)?;
        Ok(Self {
            hash: body.hash,
            ledger: body.ledger,
            envelope_xdr: body.envelope_xdr,
            result_xdr: body.result_xdr,
            result_meta_xdr: body.result_meta_xdr,
            result,
        })
    }

    /// The result of the operation at `index`.
    pub fn result_value_for_operation(&self, index: usize) -> Result<&OperationResult, TransactionError> {
        self.result.result_value_for_operation(index)
    }

    /// The id of the claimable balance created by the operation at `index`.
    pub fn created_claimable_balance_id(&self, index: usize) -> Result<ClaimableBalanceId, TransactionError> {
        self.result.created_claimable_balance_id(index)
    }
}

/// Result codes Horizon attaches to a failed submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultCodes {
    /// Transaction-level code, e.g. `tx_failed` or `tx_bad_seq`.
    pub transaction: String,
    /// One code per operation, e.g. `op_success`, `op_underfunded`.
    #[serde(default)]
    pub operations: Vec<String>,
}

impl std::fmt::Display for ResultCodes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.operations.is_empty() {
            write!(f, "{}", self.transaction)
        } else {
            write!(f, "{} [{}]", self.transaction, self.operations.join(", "))
        }
    }
}

/// A submission the ledger rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionFailure {
    /// Transaction and operation result codes.
    pub result_codes: ResultCodes,
    /// Decoded result, when Horizon included `result_xdr`.
    pub result: Option<TransactionResult>,
    /// Envelope as submitted (base64), when reported.
    pub envelope_xdr: Option<String>,
}

/// Outcome of a submission that reached Horizon and got a transaction verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionResult {
    /// Applied to the ledger.
    Success(SubmitTransactionResponse),
    /// Rejected or failed, with result codes.
    TransactionFailed(TransactionFailure),
}

impl SubmissionResult {
    /// Whether the transaction was applied.
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionResult::Success(_))
    }

    /// The success response, or `HorizonError::TransactionFailed`.
    pub fn into_success(self) -> Result<SubmitTransactionResponse, HorizonError> {
        match self {
            SubmissionResult::Success(resp) => Ok(resp),
            SubmissionResult::TransactionFailed(failure) => {
                Err(HorizonError::TransactionFailed(failure.result_codes))
            }
        }
    }
}

/// Extras of a `transaction_failed` problem document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct ProblemExtras {
    #[serde(default)]
    pub envelope_xdr: Option<String>,
    #[serde(default)]
    pub result_xdr: Option<String>,
    #[serde(default)]
    pub result_codes: Option<ResultCodes>,
}

/// An RFC 7807 problem document as Horizon returns it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Problem {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub extras: Option<ProblemExtras>,
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Authorization flags of an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountFlags {
    /// Trustlines need issuer authorization.
    #[serde(default)]
    pub auth_required: bool,
    /// The issuer may revoke authorization.
    #[serde(default)]
    pub auth_revocable: bool,
    /// Flags can no longer change.
    #[serde(default)]
    pub auth_immutable: bool,
    /// The issuer may claw back balances.
    #[serde(default)]
    pub auth_clawback_enabled: bool,
}

impl AccountFlags {
    /// The flags as the ledger's bit set.
    pub fn bits(&self) -> u32 {
        let mut bits = 0;
        if self.auth_required {
            bits |= AUTH_REQUIRED_FLAG;
        }
        if self.auth_revocable {
            bits |= AUTH_REVOCABLE_FLAG;
        }
        if self.auth_immutable {
            bits |= AUTH_IMMUTABLE_FLAG;
        }
        if self.auth_clawback_enabled {
            bits |= AUTH_CLAWBACK_ENABLED_FLAG;
        }
        bits
    }
}

/// One balance line of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// `native`, `credit_alphanum4`, `credit_alphanum12` or `liquidity_pool_shares`.
    pub asset_type: String,
    /// Asset code for credit assets.
    #[serde(default)]
    pub asset_code: Option<String>,
    /// Issuer for credit assets.
    #[serde(default)]
    pub asset_issuer: Option<String>,
    /// Decimal balance.
    pub balance: String,
}

/// An account record from `GET /accounts/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountResponse {
    /// `G…` account id.
    pub account_id: String,
    /// Current sequence number, as a decimal string.
    pub sequence: String,
    /// Number of subentries (trustlines, offers, signers, data).
    #[serde(default)]
    pub subentry_count: u32,
    /// Home domain, if set.
    #[serde(default)]
    pub home_domain: Option<String>,
    /// Authorization flags.
    #[serde(default)]
    pub flags: AccountFlags,
    /// Balances.
    #[serde(default)]
    pub balances: Vec<Balance>,
}

impl AccountResponse {
    /// The sequence number as an integer.
    pub fn sequence_number(&self) -> Result<i64, HorizonError> {
        self.sequence.parse().map_err(|_| {
            HorizonError::InvalidResponse(format!("account sequence {:?} is not a number", self.sequence))
        })
    }

    /// An [`Account`] ready for the transaction builder.
    pub fn to_account(&self) -> Result<Account, HorizonError> {
        let key = stellar_primitives::PublicKey::from_account_id(&self.account_id)
            .map_err(|e| HorizonError::InvalidResponse(format!("account id: {}", e)))?;
        Ok(Account::new(key, self.sequence_number()?))
    }
}
