//! Error types for Horizon operations.

use stellar_transaction::TransactionError;

use crate::types::ResultCodes;

/// Errors that can occur when talking to Horizon.
#[derive(Debug, thiserror::Error)]
pub enum HorizonError {
    /// The request did not complete: connection refused, timeout, or a body
    /// that could not be parsed.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The ledger rejected the transaction.
    #[error("transaction failed: {0}")]
    TransactionFailed(ResultCodes),

    /// Horizon answered with a problem document unrelated to a transaction
    /// verdict (rate limiting, server error, bad request).
    #[error("horizon problem ({status}) {title}: {detail}")]
    Problem {
        /// HTTP status.
        status: u16,
        /// Problem title.
        title: String,
        /// Problem detail, or empty.
        detail: String,
    },

    /// The requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Horizon answered with data this client cannot interpret.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// A request argument was rejected before sending.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Encoding the envelope or decoding a result failed.
    #[error("xdr error: {0}")]
    Xdr(#[from] TransactionError),
}
