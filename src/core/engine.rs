//! Ledger engine
//!
//! This module provides the LedgerEngine that owns all accounting state and
//! exposes every ledger operation. It coordinates the AccountManager, the
//! LoanBook, the aggregate counters and the custody/clock collaborators.
//!
//! # Atomicity
//!
//! Every mutating operation follows the same shape:
//! 1. Validate inputs and compute every new value with checked arithmetic
//! 2. Request the external transfers, reversing earlier ones if a later one fails
//! 3. Commit records and aggregate counters
//!
//! A failure in steps 1 or 2 leaves ledger state untouched.

use crate::core::account_manager::AccountManager;
use crate::core::clock::ManualClock;
use crate::core::config::{AdminMode, LedgerConfig};
use crate::core::custody::InMemoryCustody;
use crate::core::interest::{elapsed, interest, required_collateral};
use crate::core::loan_book::{new_loan, LoanBook};
use crate::core::traits::{Clock, Custody};
use crate::types::{
    Account, AccountStatement, Amount, Identity, LedgerError, Loan, LoanId, PlatformStats,
};
use tracing::{debug, error, info};

/// Engine wired to the in-memory collaborators
pub type DefaultEngine = LedgerEngine<InMemoryCustody, ManualClock>;

/// Single-ledger accounting engine
///
/// Exclusively owns accounts, loans and aggregate totals. Callers are
/// identified by the `caller` argument of each operation.
pub struct LedgerEngine<C = InMemoryCustody, K = ManualClock> {
    config: LedgerConfig,
    accounts: AccountManager,
    loans: LoanBook,
    custody: C,
    clock: K,
    total_deposits: Amount,
    total_loans: Amount,

    /// Rate snapshotted by newly issued loans
    loan_rate: u64,
    paused: bool,
}

impl<C: Custody, K: Clock> LedgerEngine<C, K> {
    /// Create an engine with no accounts or loans
    pub fn new(config: LedgerConfig, custody: C, clock: K) -> Self {
        let loan_rate = config.interest_rate;
        LedgerEngine {
            config,
            accounts: AccountManager::new(),
            loans: LoanBook::new(),
            custody,
            clock,
            total_deposits: 0,
            total_loans: 0,
            loan_rate,
            paused: false,
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn custody(&self) -> &C {
        &self.custody
    }

    pub fn custody_mut(&mut self) -> &mut C {
        &mut self.custody
    }

    pub fn clock(&self) -> &K {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut K {
        &mut self.clock
    }

    /// Open an account for `caller` funded with `initial_deposit`
    ///
    /// # Errors
    ///
    /// - `NotAuthorized` if `caller` is the custody pool
    /// - `InvalidAmount` if `initial_deposit` is below the minimum deposit
    /// - `AccountAlreadyExists` if `caller` already has an account
    /// - `TransferFailed` if the caller cannot fund the deposit
    pub fn create_account(
        &mut self,
        caller: &Identity,
        initial_deposit: Amount,
    ) -> Result<(), LedgerError> {
        self.ensure_running(caller, "create_account")?;

        if initial_deposit < self.config.min_deposit {
            return Err(LedgerError::invalid_amount(
                initial_deposit,
                "create_account",
            ));
        }
        if self.accounts.contains(caller) {
            return Err(LedgerError::account_already_exists(caller));
        }

        let total_deposits = self
            .total_deposits
            .checked_add(initial_deposit)
            .ok_or_else(|| LedgerError::arithmetic_overflow("create_account"))?;

        self.pull(caller, initial_deposit)?;

        let now = self.clock.now();
        self.accounts.open(caller, initial_deposit, now)?;
        self.total_deposits = total_deposits;

        debug!(owner = %caller, amount = initial_deposit, "account created");
        Ok(())
    }

    /// Add `amount` to the caller's principal
    ///
    /// Accrued interest is not folded in; the accrual anchor restarts at now.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if the caller has no account
    /// - `InvalidAmount` if `amount` is below the minimum deposit
    /// - `NotAuthorized` if the account is inactive
    /// - `TransferFailed` if the caller cannot fund the deposit
    pub fn deposit(&mut self, caller: &Identity, amount: Amount) -> Result<(), LedgerError> {
        self.ensure_running(caller, "deposit")?;

        let account = self.accounts.require(caller)?;
        if amount < self.config.min_deposit {
            return Err(LedgerError::invalid_amount(amount, "deposit"));
        }
        if !account.is_active {
            return Err(LedgerError::not_authorized(caller, "deposit"));
        }

        let new_balance = account
            .balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("deposit"))?;
        let total_deposits = self
            .total_deposits
            .checked_add(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("deposit"))?;

        self.pull(caller, amount)?;

        let now = self.clock.now();
        self.accounts.reset_balance(caller, new_balance, now)?;
        self.total_deposits = total_deposits;

        debug!(owner = %caller, amount, balance = new_balance, "deposit applied");
        Ok(())
    }

    /// Withdraw `amount` from principal plus accrued interest
    ///
    /// Interest is realized into the balance, the withdrawn amount is
    /// subtracted, and the accrual anchor restarts at now. `total_deposits`
    /// drops by the withdrawn amount only.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if the caller has no account
    /// - `NotAuthorized` if the account is inactive
    /// - `InsufficientBalance` if `amount` exceeds balance plus interest
    /// - `ArithmeticOverflow` if `total_deposits` cannot absorb the withdrawal,
    ///   which can happen once interest is realized even when the balance covers it
    /// - `TransferFailed` if the custody pool cannot pay out
    pub fn withdraw(&mut self, caller: &Identity, amount: Amount) -> Result<(), LedgerError> {
        self.ensure_running(caller, "withdraw")?;

        let account = self.accounts.require_active(caller, "withdraw")?;
        let now = self.clock.now();
        let total_balance = self.accrued_balance(account, now, "withdraw")?;

        if amount > total_balance {
            return Err(LedgerError::insufficient_balance(
                caller,
                total_balance,
                amount,
            ));
        }

        let total_deposits = self
            .total_deposits
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("withdraw"))?;

        self.push(caller, amount)?;

        let new_balance = total_balance - amount;
        self.accounts.reset_balance(caller, new_balance, now)?;
        self.total_deposits = total_deposits;

        debug!(owner = %caller, amount, balance = new_balance, "withdrawal applied");
        Ok(())
    }

    /// Move `amount` of principal from the caller to `recipient`
    ///
    /// No custody movement, no interest computation, no anchor reset.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if either account is missing
    /// - `NotAuthorized` if either account is inactive
    /// - `InsufficientBalance` if `amount` exceeds the caller's principal
    pub fn transfer(
        &mut self,
        caller: &Identity,
        recipient: &Identity,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.ensure_running(caller, "transfer")?;

        self.accounts.move_principal(caller, recipient, amount)?;

        debug!(from = %caller, to = %recipient, amount, "transfer applied");
        Ok(())
    }

    /// Issue a collateralized loan to the caller
    ///
    /// Pulls the collateral into custody, then pays out the principal. If
    /// the payout fails the collateral is returned and the loan is not
    /// recorded.
    ///
    /// # Returns
    ///
    /// The globally unique id of the new loan
    ///
    /// # Errors
    ///
    /// - `InsufficientCollateral` if collateral is below the required ratio
    /// - `InvalidAmount` if `loan_amount` is zero
    /// - `TransferFailed` if either custody transfer fails
    pub fn request_loan(
        &mut self,
        caller: &Identity,
        loan_amount: Amount,
        collateral_amount: Amount,
    ) -> Result<LoanId, LedgerError> {
        self.ensure_running(caller, "request_loan")?;

        let required = required_collateral(loan_amount, self.config.collateral_ratio);
        if u128::from(collateral_amount) < required {
            return Err(LedgerError::insufficient_collateral(
                Amount::try_from(required).unwrap_or(Amount::MAX),
                collateral_amount,
            ));
        }
        if loan_amount == 0 {
            return Err(LedgerError::invalid_amount(loan_amount, "request_loan"));
        }

        let loan_id = self.loans.next_loan_id()?;
        let total_loans = self
            .total_loans
            .checked_add(loan_amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("request_loan"))?;

        self.pull(caller, collateral_amount)?;
        if let Err(e) = self.push(caller, loan_amount) {
            self.refund(caller, collateral_amount);
            return Err(e);
        }

        let now = self.clock.now();
        self.loans.issue(new_loan(
            caller,
            loan_id,
            loan_amount,
            collateral_amount,
            now,
            self.loan_rate,
        ));
        self.total_loans = total_loans;

        debug!(
            owner = %caller,
            loan_id,
            amount = loan_amount,
            collateral = collateral_amount,
            rate = self.loan_rate,
            "loan issued"
        );
        Ok(loan_id)
    }

    /// Repay an outstanding loan and release its collateral
    ///
    /// Pulls principal plus interest at the loan's snapshotted rate, then
    /// returns the full collateral. If the collateral cannot be returned the
    /// repayment is refunded and the loan stays active.
    ///
    /// # Returns
    ///
    /// The total repayment pulled from the caller
    ///
    /// # Errors
    ///
    /// - `LoanNotFound` if no active loan exists at `(caller, loan_id)`
    /// - `TransferFailed` if either custody transfer fails
    pub fn repay_loan(&mut self, caller: &Identity, loan_id: LoanId) -> Result<Amount, LedgerError> {
        self.ensure_running(caller, "repay_loan")?;

        let loan = self.loans.require_active(caller, loan_id)?;
        let now = self.clock.now();
        let owed = interest(
            loan.amount,
            loan.interest_rate,
            elapsed(loan.timestamp, now),
        )
        .and_then(|accrued| loan.amount.checked_add(accrued))
        .ok_or_else(|| LedgerError::arithmetic_overflow("repay_loan"))?;
        let (amount, collateral) = (loan.amount, loan.collateral);

        let total_loans = self
            .total_loans
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("repay_loan"))?;

        self.pull(caller, owed)?;
        if let Err(e) = self.push(caller, collateral) {
            self.refund(caller, owed);
            return Err(e);
        }

        self.loans.close(caller, loan_id)?;
        self.total_loans = total_loans;

        debug!(owner = %caller, loan_id, repayment = owed, collateral, "loan repaid");
        Ok(owed)
    }

    /// Principal plus accrued interest for `owner`
    pub fn account_balance(&self, owner: &Identity) -> Result<Amount, LedgerError> {
        let account = self.accounts.require(owner)?;
        self.accrued_balance(account, self.clock.now(), "account_balance")
    }

    /// Stored account record for `owner`
    pub fn account_details(&self, owner: &Identity) -> Result<&Account, LedgerError> {
        self.accounts.require(owner)
    }

    /// Stored loan record, active or repaid
    pub fn loan_details(&self, owner: &Identity, loan_id: LoanId) -> Result<&Loan, LedgerError> {
        self.loans
            .get(owner, loan_id)
            .ok_or_else(|| LedgerError::loan_not_found(owner, loan_id))
    }

    pub fn platform_stats(&self) -> PlatformStats {
        PlatformStats {
            total_deposits: self.total_deposits,
            total_loans: self.total_loans,
            total_loan_count: self.loans.issued_count(),
        }
    }

    pub fn account_exists(&self, owner: &Identity) -> bool {
        self.accounts.contains(owner)
    }

    /// Number of loans ever issued to `owner`
    pub fn loan_count(&self, owner: &Identity) -> u64 {
        self.loans.loan_count(owner)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Rate that the next issued loan will snapshot
    pub fn current_interest_rate(&self) -> u64 {
        self.loan_rate
    }

    /// All accounts sorted by owner
    pub fn accounts(&self) -> Vec<&Account> {
        self.accounts.get_all_accounts()
    }

    /// Reporting rows for every account at the current clock value
    pub fn statements(&self) -> Result<Vec<AccountStatement>, LedgerError> {
        let now = self.clock.now();
        self.accounts
            .get_all_accounts()
            .into_iter()
            .map(|account| -> Result<AccountStatement, LedgerError> {
                Ok(AccountStatement {
                    owner: account.owner.clone(),
                    balance: account.balance,
                    accrued_balance: self.accrued_balance(account, now, "statements")?,
                    deposit_timestamp: account.deposit_timestamp,
                    is_active: account.is_active,
                    loan_count: self.loans.loan_count(&account.owner),
                })
            })
            .collect()
    }

    /// Halt all mutating operations
    ///
    /// Only the admin may call this. Without `AdminMode::Enforced` the call
    /// is validated and echoed but has no effect.
    pub fn emergency_pause(&mut self, caller: &Identity) -> Result<(), LedgerError> {
        self.authorize_admin(caller, "emergency_pause")?;

        if self.config.admin_mode == AdminMode::Enforced {
            self.paused = true;
        }

        info!(admin = %caller, paused = self.paused, "emergency pause requested");
        Ok(())
    }

    /// Lift an emergency pause
    pub fn resume(&mut self, caller: &Identity) -> Result<(), LedgerError> {
        self.authorize_admin(caller, "resume")?;

        if self.config.admin_mode == AdminMode::Enforced {
            self.paused = false;
        }

        info!(admin = %caller, paused = self.paused, "resume requested");
        Ok(())
    }

    /// Change the rate snapshotted by subsequently issued loans
    ///
    /// Existing loans keep their rate and deposit interest is unaffected.
    /// Without `AdminMode::Enforced` the new rate is validated and echoed
    /// but not applied.
    ///
    /// # Errors
    ///
    /// - `NotAuthorized` if the caller is not the admin
    /// - `InvalidAmount` if `new_rate` exceeds the maximum rate
    pub fn update_interest_rate(
        &mut self,
        caller: &Identity,
        new_rate: u64,
    ) -> Result<u64, LedgerError> {
        self.authorize_admin(caller, "update_interest_rate")?;

        if new_rate > self.config.max_interest_rate {
            return Err(LedgerError::invalid_amount(
                new_rate,
                "update_interest_rate",
            ));
        }

        if self.config.admin_mode == AdminMode::Enforced {
            self.loan_rate = new_rate;
        }

        info!(admin = %caller, requested = new_rate, rate = self.loan_rate, "interest rate update");
        Ok(new_rate)
    }

    fn accrued_balance(
        &self,
        account: &Account,
        now: u64,
        operation: &str,
    ) -> Result<Amount, LedgerError> {
        interest(
            account.balance,
            self.config.interest_rate,
            elapsed(account.deposit_timestamp, now),
        )
        .and_then(|accrued| account.balance.checked_add(accrued))
        .ok_or_else(|| LedgerError::arithmetic_overflow(operation))
    }

    /// Gate for caller operations: rejected while paused, and never open to
    /// the custody pool, whose pulls would be pool-to-pool no-ops
    fn ensure_running(&self, caller: &Identity, operation: &str) -> Result<(), LedgerError> {
        if self.paused || caller == &self.config.pool {
            return Err(LedgerError::not_authorized(caller, operation));
        }
        Ok(())
    }

    fn authorize_admin(&self, caller: &Identity, operation: &str) -> Result<(), LedgerError> {
        if caller != &self.config.admin {
            return Err(LedgerError::not_authorized(caller, operation));
        }
        Ok(())
    }

    /// Move funds from `from` into the custody pool
    fn pull(&mut self, from: &Identity, amount: Amount) -> Result<(), LedgerError> {
        let pool = &self.config.pool;
        self.custody
            .transfer(amount, from, pool)
            .map_err(|e| LedgerError::transfer_failed(from, pool, amount, e))
    }

    /// Move funds from the custody pool to `to`
    fn push(&mut self, to: &Identity, amount: Amount) -> Result<(), LedgerError> {
        let pool = &self.config.pool;
        self.custody
            .transfer(amount, pool, to)
            .map_err(|e| LedgerError::transfer_failed(pool, to, amount, e))
    }

    /// Reverse an earlier pull within the same operation
    fn refund(&mut self, to: &Identity, amount: Amount) {
        if let Err(e) = self.push(to, amount) {
            error!(owner = %to, amount, error = %e, "compensating refund failed");
        }
    }
}

impl Default for DefaultEngine {
    fn default() -> Self {
        Self::new(
            LedgerConfig::default(),
            InMemoryCustody::new(),
            ManualClock::default(),
        )
    }
}
