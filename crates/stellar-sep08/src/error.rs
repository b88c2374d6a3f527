//! Error types for SEP-0008 approval operations.

use stellar_horizon::HorizonError;

/// Errors that can occur while driving the approval workflow.
#[derive(Debug, thiserror::Error)]
pub enum Sep08Error {
    /// No response was obtained (connection, timeout, unreadable body).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The reply is not JSON or its discriminant is missing or unknown.
    #[error("unrecognized approval response: {0}")]
    UnrecognizedApprovalResponse(String),

    /// The reply names a known outcome but lacks a required field.
    #[error("malformed approval payload: {0}")]
    MalformedApprovalPayload(String),

    /// A regulated asset descriptor does not name a valid ledger asset.
    #[error("invalid regulated asset: {0}")]
    InvalidAsset(String),

    /// Looking up the issuer account failed.
    #[error("horizon error: {0}")]
    Horizon(#[from] HorizonError),
}
