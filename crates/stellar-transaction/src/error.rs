/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Binary or text input violates the envelope format (truncation, bad
    /// discriminant, non-zero padding, trailing bytes, unparseable field).
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A claim predicate nests deeper than the codec accepts.
    #[error("claim predicate depth {depth} exceeds maximum {max}")]
    PredicateTooDeep {
        /// Depth of the offending predicate tree.
        depth: usize,
        /// Configured maximum depth.
        max: usize,
    },

    /// A transaction was built without any operations.
    #[error("transaction has no operations")]
    EmptyOperationList,

    /// A transaction would exceed the maximum operation count.
    #[error("transaction has {count} operations, maximum is {max}")]
    TooManyOperations {
        /// Number of operations requested.
        count: usize,
        /// Maximum operations per transaction.
        max: usize,
    },

    /// The total fee does not fit the fee field.
    #[error("invalid fee: {0}")]
    InvalidFee(String),

    /// The transaction already carries a signature and can no longer be changed.
    #[error("transaction is already signed")]
    AlreadySigned,

    /// An amount is negative, has more than 7 decimals, or overflows.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// A price is not a positive fraction that fits in 32 bits.
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    /// An asset code or canonical asset string is invalid.
    #[error("invalid asset: {0}")]
    InvalidAsset(String),

    /// A memo value is out of range.
    #[error("invalid memo: {0}")]
    InvalidMemo(String),

    /// A claimable balance was created without claimants.
    #[error("claimable balance needs at least one claimant")]
    EmptyClaimantList,

    /// A claimable balance lists more claimants than the codec accepts.
    #[error("claimable balance has {count} claimants, maximum is {max}")]
    TooManyClaimants {
        /// Number of claimants given.
        count: usize,
        /// Configured maximum.
        max: usize,
    },

    /// An operation body violates a structural constraint.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// An operation result index is past the end of the result list.
    #[error("operation index {index} out of range ({len} results)")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of operation results.
        len: usize,
    },

    /// The stored operation result does not have the requested shape.
    #[error("unexpected operation result type: expected {expected}, found {found}")]
    UnexpectedOperationResultType {
        /// Shape the caller asked for.
        expected: &'static str,
        /// Shape actually stored.
        found: String,
    },

    /// An underlying primitives error (forwarded from `stellar-primitives`).
    #[error("primitives error: {0}")]
    Primitives(#[from] stellar_primitives::PrimitivesError),
}
