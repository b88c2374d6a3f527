/// Stellar SDK - Transaction building, signing, and serialization.
///
/// Provides the XDR codec, claim predicates, operations, the
/// `TransactionBuilder`, network-bound hashing and signing, the txrep text
/// form, and decoding of transaction results.

pub mod account;
pub mod amount;
pub mod asset;
pub mod builder;
pub mod codec;
pub mod memo;
pub mod operation;
pub mod predicate;
pub mod result;
pub mod transaction;
mod txrep;

mod error;
pub use account::{Account, MuxedAccount};
pub use amount::Price;
pub use asset::Asset;
pub use builder::TransactionBuilder;
pub use codec::{CodecLimits, XdrCodec};
pub use error::TransactionError;
pub use memo::Memo;
pub use operation::{ClaimableBalanceId, Operation, OperationBody, OperationType};
pub use predicate::{Claimant, Predicate};
pub use result::{OperationResult, TransactionResult};
pub use transaction::{DecoratedSignature, TimeBounds, Transaction};

#[cfg(test)]
mod tests;
