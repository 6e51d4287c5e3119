//! Loan-related types for the ledger engine

use super::operation::{Amount, Identity, LoanId, Timestamp};

/// Collateralized loan record
///
/// Keyed by `(owner, loan_id)`. Once `is_active` is cleared the record is
/// never modified again and its id is never reissued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loan {
    pub owner: Identity,
    pub loan_id: LoanId,

    /// Principal borrowed
    pub amount: Amount,

    /// Collateral locked against the loan, returned in full on repayment
    pub collateral: Amount,

    /// Issuance time and accrual anchor
    pub timestamp: Timestamp,

    /// Rate (percent per year) snapshotted at issuance
    pub interest_rate: u64,

    /// True while the loan is outstanding
    pub is_active: bool,
}

/// Process-wide aggregate counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlatformStats {
    /// Net deposit/withdraw movements through the custody pool
    pub total_deposits: Amount,

    /// Outstanding loan principal
    pub total_loans: Amount,

    /// Number of loans ever issued
    pub total_loan_count: u64,
}
