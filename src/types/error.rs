//! Error types for the ledger engine
//!
//! This module defines all error types that can occur while operating the
//! ledger or replaying operation scripts.
//!
//! # Error Categories
//!
//! - **Ledger Errors**: Authorization, balance, amount, account and loan checks
//! - **Collaborator Errors**: Custody transfer refusals, clock regressions
//! - **Arithmetic Errors**: Overflow or underflow of amounts and aggregate totals
//! - **Script Errors**: File I/O and CSV parsing problems

use super::operation::{Amount, Identity, LoanId, Timestamp};
use thiserror::Error;

/// Main error type for the ledger engine
///
/// Every ledger operation returns either its success value or exactly one of
/// these variants. No variant is fatal to the engine: a failed operation
/// leaves ledger state untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Caller may not perform the operation
    ///
    /// Raised for non-admin callers of administrative operations, inactive
    /// accounts, and any mutation while the ledger is paused.
    #[error("{caller} is not authorized to {operation}")]
    NotAuthorized {
        /// Identity that attempted the operation
        caller: Identity,
        /// Operation that was refused
        operation: String,
    },

    /// Requested amount exceeds what the account holds
    #[error("Insufficient balance for {owner}: available {available}, requested {requested}")]
    InsufficientBalance {
        owner: Identity,
        available: Amount,
        requested: Amount,
    },

    /// Amount is outside the range accepted by the operation
    #[error("Invalid amount {amount} for {operation}")]
    InvalidAmount { amount: Amount, operation: String },

    /// No account exists for the identity
    #[error("Account not found for {owner}")]
    AccountNotFound { owner: Identity },

    /// An account already exists for the identity
    #[error("Account already exists for {owner}")]
    AccountAlreadyExists { owner: Identity },

    /// No active loan exists at `(owner, loan_id)`
    #[error("Loan {loan_id} not found for {owner}")]
    LoanNotFound { owner: Identity, loan_id: LoanId },

    /// Collateral does not cover the required ratio of the loan principal
    #[error("Insufficient collateral: required {required}, provided {provided}")]
    InsufficientCollateral { required: Amount, provided: Amount },

    /// The custody collaborator refused a transfer
    ///
    /// The operation is aborted and any transfer already issued within it is
    /// reversed.
    #[error("Transfer of {amount} from {from} to {to} failed: {reason}")]
    TransferFailed {
        from: Identity,
        to: Identity,
        amount: Amount,
        reason: String,
    },

    /// Checked arithmetic on an amount or aggregate total failed
    #[error("Arithmetic overflow in {operation}")]
    ArithmeticOverflow { operation: String },

    /// The clock was asked to move backwards
    #[error("Clock regression: now {now}, requested {requested}")]
    ClockRegression { now: Timestamp, requested: Timestamp },

    /// A script record lacks a field its operation type requires
    #[error("{op_type} operation for {caller} requires {field}")]
    MissingField {
        op_type: String,
        caller: Identity,
        field: String,
    },

    /// I/O error occurred while reading a script or writing output
    #[error("I/O error: {message}")]
    IoError { message: String },

    /// CSV parsing error occurred
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        message: String,
    },

    /// The ledger actor has shut down
    #[error("Ledger is unavailable")]
    LedgerUnavailable,
}

/// Error reported by the custody collaborator
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CustodyError {
    #[error("{identity} holds {available}, needs {requested}")]
    InsufficientFunds {
        identity: Identity,
        available: Amount,
        requested: Amount,
    },

    #[error("balance of {identity} would overflow")]
    Overflow { identity: Identity },

    #[error("{0}")]
    Rejected(String),
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        LedgerError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl LedgerError {
    /// Short stable code used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerError::NotAuthorized { .. } => "not_authorized",
            LedgerError::InsufficientBalance { .. } => "insufficient_balance",
            LedgerError::InvalidAmount { .. } => "invalid_amount",
            LedgerError::AccountNotFound { .. } => "account_not_found",
            LedgerError::AccountAlreadyExists { .. } => "account_already_exists",
            LedgerError::LoanNotFound { .. } => "loan_not_found",
            LedgerError::InsufficientCollateral { .. } => "insufficient_collateral",
            LedgerError::TransferFailed { .. } => "transfer_failed",
            LedgerError::ArithmeticOverflow { .. } => "arithmetic_overflow",
            LedgerError::ClockRegression { .. } => "clock_regression",
            LedgerError::MissingField { .. } => "missing_field",
            LedgerError::IoError { .. } => "io_error",
            LedgerError::ParseError { .. } => "parse_error",
            LedgerError::LedgerUnavailable => "ledger_unavailable",
        }
    }

    pub fn not_authorized(caller: &Identity, operation: &str) -> Self {
        LedgerError::NotAuthorized {
            caller: caller.clone(),
            operation: operation.to_string(),
        }
    }

    pub fn insufficient_balance(owner: &Identity, available: Amount, requested: Amount) -> Self {
        LedgerError::InsufficientBalance {
            owner: owner.clone(),
            available,
            requested,
        }
    }

    pub fn invalid_amount(amount: Amount, operation: &str) -> Self {
        LedgerError::InvalidAmount {
            amount,
            operation: operation.to_string(),
        }
    }

    pub fn account_not_found(owner: &Identity) -> Self {
        LedgerError::AccountNotFound {
            owner: owner.clone(),
        }
    }

    pub fn account_already_exists(owner: &Identity) -> Self {
        LedgerError::AccountAlreadyExists {
            owner: owner.clone(),
        }
    }

    pub fn loan_not_found(owner: &Identity, loan_id: LoanId) -> Self {
        LedgerError::LoanNotFound {
            owner: owner.clone(),
            loan_id,
        }
    }

    pub fn insufficient_collateral(required: Amount, provided: Amount) -> Self {
        LedgerError::InsufficientCollateral { required, provided }
    }

    pub fn transfer_failed(
        from: &Identity,
        to: &Identity,
        amount: Amount,
        cause: CustodyError,
    ) -> Self {
        LedgerError::TransferFailed {
            from: from.clone(),
            to: to.clone(),
            amount,
            reason: cause.to_string(),
        }
    }

    pub fn arithmetic_overflow(operation: &str) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
        }
    }

    pub fn missing_field(op_type: &str, caller: &Identity, field: &str) -> Self {
        LedgerError::MissingField {
            op_type: op_type.to_string(),
            caller: caller.clone(),
            field: field.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::not_authorized(
        LedgerError::not_authorized(&Identity::from("mallory"), "update_interest_rate"),
        "mallory is not authorized to update_interest_rate"
    )]
    #[case::insufficient_balance(
        LedgerError::insufficient_balance(&Identity::from("alice"), 500, 1000),
        "Insufficient balance for alice: available 500, requested 1000"
    )]
    #[case::invalid_amount(
        LedgerError::invalid_amount(999_999, "create_account"),
        "Invalid amount 999999 for create_account"
    )]
    #[case::account_already_exists(
        LedgerError::account_already_exists(&Identity::from("alice")),
        "Account already exists for alice"
    )]
    #[case::loan_not_found(
        LedgerError::loan_not_found(&Identity::from("bob"), 7),
        "Loan 7 not found for bob"
    )]
    #[case::insufficient_collateral(
        LedgerError::insufficient_collateral(1_500_000, 1_499_999),
        "Insufficient collateral: required 1500000, provided 1499999"
    )]
    #[case::parse_error_with_line(
        LedgerError::ParseError { line: Some(42), message: "Invalid field".to_string() },
        "CSV parse error at line 42: Invalid field"
    )]
    #[case::parse_error_without_line(
        LedgerError::ParseError { line: None, message: "Invalid field".to_string() },
        "CSV parse error: Invalid field"
    )]
    #[case::clock_regression(
        LedgerError::ClockRegression { now: 10, requested: 4 },
        "Clock regression: now 10, requested 4"
    )]
    fn test_error_display(#[case] error: LedgerError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn test_already_exists_is_distinct_from_not_found() {
        let owner = Identity::from("alice");
        let exists = LedgerError::account_already_exists(&owner);
        let missing = LedgerError::account_not_found(&owner);

        assert_ne!(exists, missing);
        assert_ne!(exists.kind(), missing.kind());
    }

    #[test]
    fn test_transfer_failed_carries_custody_reason() {
        let cause = CustodyError::InsufficientFunds {
            identity: Identity::from("bob"),
            available: 500_000,
            requested: 1_000_000,
        };
        let error = LedgerError::transfer_failed(
            &Identity::from("bob"),
            &Identity::from("custody-pool"),
            1_000_000,
            cause,
        );

        assert_eq!(
            error.to_string(),
            "Transfer of 1000000 from bob to custody-pool failed: bob holds 500000, needs 1000000"
        );
        assert_eq!(error.kind(), "transfer_failed");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: LedgerError = io_error.into();
        assert!(matches!(error, LedgerError::IoError { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }
}
