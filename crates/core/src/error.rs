//! Error taxonomy for engine operations.
//!
//! Every failure the engine can produce is one of five recoverable,
//! entry-scoped kinds: validation, invalid state, permission, not found,
//! or conflict. The engine never partially applies a transition before
//! returning an error; the API layer maps kinds to responses.

use rust_decimal::Decimal;
use thiserror::Error;

use finbook_shared::types::{AccountId, JournalEntryId};

use crate::actor::Role;
use crate::journal::EntryStatus;

/// Errors that can occur during engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    // ========== Validation Errors ==========
    /// Journal entry must have at least 2 lines.
    #[error("Journal entry must have at least 2 lines (got {count})")]
    InsufficientLines {
        /// Number of lines supplied.
        count: usize,
    },

    /// Journal entry has only one side (all debits or all credits).
    #[error("Journal entry must contain both debit and credit lines")]
    SingleSided,

    /// Line amount cannot be zero.
    #[error("Line amount cannot be zero")]
    ZeroAmount,

    /// Line amount cannot be negative.
    #[error("Line amount cannot be negative: {amount}")]
    NegativeAmount {
        /// The offending amount.
        amount: Decimal,
    },

    /// Line references an account that does not exist.
    #[error("Line references unknown account: {0}")]
    UnknownLineAccount(AccountId),

    /// Line references an inactive account.
    #[error("Line references inactive account: {0}")]
    InactiveLineAccount(AccountId),

    /// Journal entry is not balanced (debits != credits).
    #[error("Journal entry is not balanced. Debits: {debits}, Credits: {credits}")]
    Unbalanced {
        /// Total debit amount.
        debits: Decimal,
        /// Total credit amount.
        credits: Decimal,
    },

    /// Rejection reason is too short.
    #[error("Rejection reason must be at least {min} characters (got {len})")]
    RejectionReasonTooShort {
        /// Trimmed length of the supplied reason.
        len: usize,
        /// Configured minimum length.
        min: usize,
    },

    // ========== State Errors ==========
    /// Entry is not in the Pending state, so it cannot transition.
    #[error("Journal entry is {status}, only pending entries can be approved or rejected")]
    NotPending {
        /// The entry's current status.
        status: EntryStatus,
    },

    /// Entry has left the Pending state and can no longer be modified.
    #[error("Journal entry is {status} and can no longer be modified or deleted")]
    EntryImmutable {
        /// The entry's current status.
        status: EntryStatus,
    },

    /// Account with a nonzero balance cannot be deactivated.
    #[error("Cannot deactivate account with nonzero balance: {balance}")]
    CannotDeactivate {
        /// The account's current balance.
        balance: Decimal,
    },

    // ========== Permission Errors ==========
    /// Actor's role cannot approve or reject entries.
    #[error("Role '{role}' cannot approve or reject journal entries")]
    ApproverRoleRequired {
        /// The actor's role.
        role: Role,
    },

    /// Actor is neither the entry's creator nor an administrator.
    #[error("Only the entry creator or an administrator can modify a pending entry")]
    NotEntryOwner,

    // ========== Not Found Errors ==========
    /// Journal entry not found.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(JournalEntryId),

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    // ========== Conflict Errors ==========
    /// Account number already exists.
    #[error("Account number '{0}' already exists")]
    DuplicateAccountNumber(String),

    /// Account name already exists.
    #[error("Account name '{0}' already exists")]
    DuplicateAccountName(String),

    /// Stored balance and ledger replay disagree.
    #[error(
        "Ledger does not reconcile for account {account_id}: stored balance {stored}, derived {derived}"
    )]
    BalanceDivergence {
        /// The account whose ledger fails to reconcile.
        account_id: AccountId,
        /// The stored (denormalized) balance.
        stored: Decimal,
        /// The balance derived by replaying postings.
        derived: Decimal,
    },
}

/// The five recoverable failure kinds the engine produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or unbalanced input.
    Validation,
    /// Transition attempted from a terminal or wrong state.
    InvalidState,
    /// Actor lacks the required capability.
    Permission,
    /// A referenced entity does not exist.
    NotFound,
    /// Unique-constraint or integrity conflict.
    Conflict,
}

impl EngineError {
    /// Returns the failure kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InsufficientLines { .. }
            | Self::SingleSided
            | Self::ZeroAmount
            | Self::NegativeAmount { .. }
            | Self::UnknownLineAccount(_)
            | Self::InactiveLineAccount(_)
            | Self::Unbalanced { .. }
            | Self::RejectionReasonTooShort { .. } => ErrorKind::Validation,

            Self::NotPending { .. } | Self::EntryImmutable { .. } | Self::CannotDeactivate { .. } => {
                ErrorKind::InvalidState
            }

            Self::ApproverRoleRequired { .. } | Self::NotEntryOwner => ErrorKind::Permission,

            Self::EntryNotFound(_) | Self::AccountNotFound(_) => ErrorKind::NotFound,

            Self::DuplicateAccountNumber(_)
            | Self::DuplicateAccountName(_)
            | Self::BalanceDivergence { .. } => ErrorKind::Conflict,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientLines { .. } => "INSUFFICIENT_LINES",
            Self::SingleSided => "SINGLE_SIDED",
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::UnknownLineAccount(_) => "UNKNOWN_LINE_ACCOUNT",
            Self::InactiveLineAccount(_) => "INACTIVE_LINE_ACCOUNT",
            Self::Unbalanced { .. } => "UNBALANCED_ENTRY",
            Self::RejectionReasonTooShort { .. } => "REJECTION_REASON_TOO_SHORT",
            Self::NotPending { .. } => "NOT_PENDING",
            Self::EntryImmutable { .. } => "ENTRY_IMMUTABLE",
            Self::CannotDeactivate { .. } => "CANNOT_DEACTIVATE",
            Self::ApproverRoleRequired { .. } => "APPROVER_ROLE_REQUIRED",
            Self::NotEntryOwner => "NOT_ENTRY_OWNER",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::DuplicateAccountNumber(_) => "DUPLICATE_ACCOUNT_NUMBER",
            Self::DuplicateAccountName(_) => "DUPLICATE_ACCOUNT_NAME",
            Self::BalanceDivergence { .. } => "BALANCE_DIVERGENCE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 400,
            ErrorKind::InvalidState => 422,
            ErrorKind::Permission => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
        }
    }
}
