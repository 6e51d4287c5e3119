//! Loan storage
//!
//! This module provides the LoanBook component that keeps every loan ever
//! issued, keyed by `(owner, loan_id)`, together with the global id counter
//! and the per-owner loan counts used for reporting.
//!
//! # Identifiers
//!
//! Loan ids come from a single process-wide counter shared by all owners.
//! The per-owner count is kept separately and never used for addressing.
//!
//! # Lifecycle
//!
//! Records are inserted active and flipped to inactive exactly once on
//! repayment. Inactive records stay in the book for audit.

use crate::types::{Amount, Identity, LedgerError, Loan, LoanId, Timestamp};
use std::collections::HashMap;

/// Loan book for issuance and repayment
pub struct LoanBook {
    /// Map of `(owner, loan_id)` to loan record
    loans: HashMap<(Identity, LoanId), Loan>,

    /// Number of loans ever issued per owner
    loan_counts: HashMap<Identity, u64>,

    /// Last id handed out; the next loan gets `last_loan_id + 1`
    last_loan_id: LoanId,
}

impl LoanBook {
    /// Create a new empty loan book
    pub fn new() -> Self {
        LoanBook {
            loans: HashMap::new(),
            loan_counts: HashMap::new(),
            last_loan_id: 0,
        }
    }

    /// Id the next issued loan will receive
    ///
    /// Does not reserve the id. Fails with `ArithmeticOverflow` once the
    /// counter is exhausted.
    pub fn next_loan_id(&self) -> Result<LoanId, LedgerError> {
        self.last_loan_id
            .checked_add(1)
            .ok_or_else(|| LedgerError::arithmetic_overflow("request_loan"))
    }

    /// Record a newly issued loan
    ///
    /// The loan must carry the id returned by `next_loan_id`. Advances the
    /// global counter and the owner's loan count.
    pub fn issue(&mut self, loan: Loan) {
        let owner = loan.owner.clone();
        self.last_loan_id = loan.loan_id;
        *self.loan_counts.entry(owner.clone()).or_insert(0) += 1;
        self.loans.insert((owner, loan.loan_id), loan);
    }

    /// Get any stored loan, active or repaid
    pub fn get(&self, owner: &Identity, loan_id: LoanId) -> Option<&Loan> {
        self.loans.get(&(owner.clone(), loan_id))
    }

    /// Get an outstanding loan
    ///
    /// Fails with `LoanNotFound` if nothing is stored at `(owner, loan_id)`
    /// or the loan was already repaid.
    pub fn require_active(&self, owner: &Identity, loan_id: LoanId) -> Result<&Loan, LedgerError> {
        self.get(owner, loan_id)
            .filter(|loan| loan.is_active)
            .ok_or_else(|| LedgerError::loan_not_found(owner, loan_id))
    }

    /// Mark an outstanding loan as repaid
    ///
    /// All other fields are retained unchanged.
    pub fn close(&mut self, owner: &Identity, loan_id: LoanId) -> Result<&Loan, LedgerError> {
        let loan = self
            .loans
            .get_mut(&(owner.clone(), loan_id))
            .filter(|loan| loan.is_active)
            .ok_or_else(|| LedgerError::loan_not_found(owner, loan_id))?;
        loan.is_active = false;
        Ok(&*loan)
    }

    /// Number of loans ever issued to `owner`
    pub fn loan_count(&self, owner: &Identity) -> u64 {
        self.loan_counts.get(owner).copied().unwrap_or(0)
    }

    /// Number of loans ever issued across all owners
    pub fn issued_count(&self) -> u64 {
        self.last_loan_id
    }

    /// Sum of principal over all active loans
    pub fn outstanding_principal(&self) -> u128 {
        self.loans
            .values()
            .filter(|loan| loan.is_active)
            .map(|loan| u128::from(loan.amount))
            .sum()
    }
}

impl Default for LoanBook {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a loan record for issuance
pub(crate) fn new_loan(
    owner: &Identity,
    loan_id: LoanId,
    amount: Amount,
    collateral: Amount,
    timestamp: Timestamp,
    interest_rate: u64,
) -> Loan {
    Loan {
        owner: owner.clone(),
        loan_id,
        amount,
        collateral,
        timestamp,
        interest_rate,
        is_active: true,
    }
}
