#![deny(missing_docs)]

//! # stellar-sep08
//!
//! Client for SEP-0008, the protocol by which an issuer of a regulated
//! asset approves each transaction that moves it.
//!
//! The caller signs a transaction, posts it to the asset's approval server
//! and branches on the [`ApprovalOutcome`]. An `ActionRequired` outcome may
//! be followed by [`RegulatedAssetsService::post_action`] calls until the
//! server reports [`ActionOutcome::Done`], after which the transaction is
//! posted again.
//!
//! # Example
//!
//! ```no_run
//! use stellar_horizon::{HorizonClient, HorizonConfig};
//! use stellar_sep08::{ApprovalOutcome, RegulatedAssetsService, Sep08Config};
//!
//! # async fn example(envelope: &str) -> Result<(), stellar_sep08::Sep08Error> {
//! let horizon = HorizonClient::new(HorizonConfig::testnet());
//! let service = RegulatedAssetsService::new(Sep08Config::default(), horizon);
//!
//! let issuer = "GAB2CB576PHBBPQ5ODORRZ2LYCMWPZGWGCN2KDK7DXOIMZASKUY3QZ6Q";
//! if service.authorization_required(issuer).await? {
//!     match service.post_transaction(envelope, "https://example.com/tx-approve").await? {
//!         ApprovalOutcome::Success { tx, .. } | ApprovalOutcome::Revised { tx, .. } => {
//!             println!("submit {}", tx);
//!         }
//!         other => println!("not approved yet: {:?}", other),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod types;


pub use client::{IssuerAccountSource, RegulatedAssetsService};
pub use error::Sep08Error;
pub use types::{ActionOutcome, ApprovalOutcome, RegulatedAsset, Sep08Config};
