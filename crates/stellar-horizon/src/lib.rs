#![deny(missing_docs)]

//! # stellar-horizon
//!
//! Minimal Horizon HTTP client: transaction submission and account lookup.
//!
//! Submission returns a [`SubmissionResult`] that separates transactions the
//! ledger applied from those it rejected with result codes; everything else
//! (transport failures, other problem documents) is a [`HorizonError`].
//!
//! # Example
//!
//! ```no_run
//! use stellar_horizon::{HorizonClient, HorizonConfig};
//!
//! let client = HorizonClient::new(HorizonConfig {
//!     base_url: "https://horizon-testnet.stellar.org".to_string(),
//!     ..Default::default()
//! });
//! ```

pub mod client;
pub mod error;
pub mod types;


pub use client::HorizonClient;
pub use error::HorizonError;
pub use types::{
    AccountFlags, AccountResponse, HorizonConfig, ResultCodes, SubmissionResult,
    SubmitTransactionResponse, TransactionFailure,
};
