#![deny(missing_docs)]

//! Stellar SDK - Complete SDK.
//!
//! Re-exports the Stellar SDK components for convenient single-crate usage:
//! keys and network identities, the transaction codec and builder, the
//! Horizon submission client and the SEP-0008 approval client.

pub use stellar_horizon as horizon;
pub use stellar_primitives as primitives;
pub use stellar_sep08 as sep08;
pub use stellar_transaction as transaction;
