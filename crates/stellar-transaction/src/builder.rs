//! Fluent construction of transactions from a caller-held `Account`.

use tracing::debug;

use crate::account::Account;
use crate::memo::Memo;
use crate::operation::Operation;
use crate::transaction::{TimeBounds, Transaction, MAX_OPERATIONS};
use crate::TransactionError;

/// Minimum and default fee per operation, in stroops.
pub const BASE_FEE: u32 = 100;

/// Builds a [`Transaction`] for an account.
///
/// `build` uses `account.sequence_number + 1` and, only when it succeeds,
/// writes that value back into the account. The network is not chosen here;
/// it is supplied when the transaction is hashed or signed.
///
/// ```ignore
/// let tx = TransactionBuilder::new(&mut account)
///     .add_operation(Operation::payment(dest, Asset::Native, "10")?)
///     .memo(Memo::text("rent")?)
///     .build()?;
/// ```
pub struct TransactionBuilder<'a> {
    account: &'a mut Account,
    base_fee: u32,
    time_bounds: Option<TimeBounds>,
    memo: Memo,
    operations: Vec<Operation>,
}

impl<'a> TransactionBuilder<'a> {
    /// Start a transaction sourced from `account`.
    pub fn new(account: &'a mut Account) -> Self {
        TransactionBuilder {
            account,
            base_fee: BASE_FEE,
            time_bounds: None,
            memo: Memo::None,
            operations: Vec::new(),
        }
    }

    /// Fee per operation in stroops; at least [`BASE_FEE`].
    pub fn base_fee(mut self, fee: u32) -> Self {
        self.base_fee = fee;
        self
    }

    /// Restrict the ledger close times at which the transaction is valid.
    pub fn time_bounds(mut self, time_bounds: TimeBounds) -> Self {
        self.time_bounds = Some(time_bounds);
        self
    }

    /// Attach a memo.
    pub fn memo(mut self, memo: Memo) -> Self {
        self.memo = memo;
        self
    }

    /// Append an operation.
    pub fn add_operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    /// Finish the transaction and advance the account's sequence number.
    ///
    /// # Returns
    /// `EmptyOperationList` with no operations, `TooManyOperations` above
    /// 100, `InvalidFee` when the base fee is below the minimum or the total
    /// overflows `u32`, or the first operation validation error.
    pub fn build(self) -> Result<Transaction, TransactionError> {
        if self.operations.is_empty() {
            return Err(TransactionError::EmptyOperationList);
        }
        if self.operations.len() > MAX_OPERATIONS {
            return Err(TransactionError::TooManyOperations {
                count: self.operations.len(),
                max: MAX_OPERATIONS,
            });
        }
        if self.base_fee < BASE_FEE {
            return Err(TransactionError::InvalidFee(format!(
                "base fee {} is below the minimum {}",
                self.base_fee, BASE_FEE
            )));
        }
        let fee = self
            .base_fee
            .checked_mul(self.operations.len() as u32)
            .ok_or_else(|| {
                TransactionError::InvalidFee(format!(
                    "{} operations at {} stroops overflow u32",
                    self.operations.len(),
                    self.base_fee
                ))
            })?;
        for op in &self.operations {
            op.validate()?;
        }

        let sequence_number = self.account.next_sequence_number()?;
        let tx = Transaction::from_parts(
            self.account.muxed_account(),
            fee,
            sequence_number,
            self.time_bounds,
            self.memo,
            self.operations,
        );
        self.account.sequence_number = sequence_number;
        debug!(
            account = %self.account.account_id,
            sequence_number,
            fee,
            operations = tx.operations().len(),
            "built transaction"
        );
        Ok(tx)
    }
}
