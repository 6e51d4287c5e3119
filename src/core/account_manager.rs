//! Account management module
//!
//! This module provides the `AccountManager` struct which maintains the
//! deposit accounts of all owners and the primitive balance updates the
//! engine commits once an operation has been validated.
//!
//! The AccountManager is responsible for:
//! - Opening accounts (exactly once per owner)
//! - Looking up accounts and checking they are active
//! - Setting balances together with the accrual anchor
//! - Moving principal between two accounts
//! - Providing sorted account listings for output

use crate::types::{Account, Amount, Identity, LedgerError, Timestamp};
use std::collections::HashMap;

/// Manages all deposit accounts
///
/// Accounts are never removed once opened.
pub struct AccountManager {
    /// Map of owners to account records
    accounts: HashMap<Identity, Account>,
}

impl AccountManager {
    /// Create a new AccountManager with no accounts
    pub fn new() -> Self {
        AccountManager {
            accounts: HashMap::new(),
        }
    }

    /// Check whether an account exists for `owner`
    pub fn contains(&self, owner: &Identity) -> bool {
        self.accounts.contains_key(owner)
    }

    /// Get an account or fail with `AccountNotFound`
    pub fn require(&self, owner: &Identity) -> Result<&Account, LedgerError> {
        self.accounts
            .get(owner)
            .ok_or_else(|| LedgerError::account_not_found(owner))
    }

    /// Get an active account
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if no account exists for `owner`
    /// - `NotAuthorized` if the account is inactive
    pub fn require_active(
        &self,
        owner: &Identity,
        operation: &str,
    ) -> Result<&Account, LedgerError> {
        let account = self.require(owner)?;
        if !account.is_active {
            return Err(LedgerError::not_authorized(owner, operation));
        }
        Ok(account)
    }

    /// Open a new account
    ///
    /// # Arguments
    ///
    /// * `owner` - Identity owning the account
    /// * `balance` - Initial principal
    /// * `now` - Creation time, becomes the accrual anchor
    ///
    /// # Errors
    ///
    /// Returns `AccountAlreadyExists` if `owner` already has an account; the
    /// existing record is left untouched.
    pub fn open(
        &mut self,
        owner: &Identity,
        balance: Amount,
        now: Timestamp,
    ) -> Result<&Account, LedgerError> {
        if self.accounts.contains_key(owner) {
            return Err(LedgerError::account_already_exists(owner));
        }

        Ok(self
            .accounts
            .entry(owner.clone())
            .or_insert_with(|| Account::new(owner.clone(), balance, now)))
    }

    /// Replace the balance of an account and reset its accrual anchor
    ///
    /// Used by deposits and withdrawals once the new balance has been
    /// computed and every external transfer has succeeded.
    pub fn reset_balance(
        &mut self,
        owner: &Identity,
        balance: Amount,
        anchor: Timestamp,
    ) -> Result<(), LedgerError> {
        let account = self
            .accounts
            .get_mut(owner)
            .ok_or_else(|| LedgerError::account_not_found(owner))?;

        account.balance = balance;
        account.deposit_timestamp = anchor;

        Ok(())
    }

    /// Move principal from one account to another
    ///
    /// No interest is computed and neither accrual anchor changes. Both
    /// accounts are validated and the credit is checked for overflow before
    /// either balance is written.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if either account is missing (sender checked first)
    /// - `NotAuthorized` if either account is inactive
    /// - `InsufficientBalance` if `amount` exceeds the sender's principal
    /// - `ArithmeticOverflow` if the recipient's balance would overflow
    pub fn move_principal(
        &mut self,
        from: &Identity,
        to: &Identity,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let sender = self.require(from)?;
        let recipient = self.require(to)?;

        if !sender.is_active {
            return Err(LedgerError::not_authorized(from, "transfer"));
        }
        if !recipient.is_active {
            return Err(LedgerError::not_authorized(to, "transfer"));
        }

        if amount > sender.balance {
            return Err(LedgerError::insufficient_balance(
                from,
                sender.balance,
                amount,
            ));
        }

        // Self-transfer passes validation and leaves the balance unchanged
        if from == to {
            return Ok(());
        }

        let new_sender_balance = sender.balance - amount;
        let new_recipient_balance = recipient
            .balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("transfer"))?;

        if let Some(sender) = self.accounts.get_mut(from) {
            sender.balance = new_sender_balance;
        }
        if let Some(recipient) = self.accounts.get_mut(to) {
            recipient.balance = new_recipient_balance;
        }

        Ok(())
    }

    /// Get all accounts sorted by owner
    ///
    /// Sorting gives deterministic output for CSV generation.
    pub fn get_all_accounts(&self) -> Vec<&Account> {
        let mut accounts: Vec<&Account> = self.accounts.values().collect();
        accounts.sort_by(|a, b| a.owner.cmp(&b.owner));
        accounts
    }

    /// Sum of all stored principal balances
    pub fn total_principal(&self) -> u128 {
        self.accounts
            .values()
            .map(|account| u128::from(account.balance))
            .sum()
    }

    #[cfg(test)]
    pub(crate) fn set_active(&mut self, owner: &Identity, is_active: bool) {
        if let Some(account) = self.accounts.get_mut(owner) {
            account.is_active = is_active;
        }
    }
}

impl Default for AccountManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn id(name: &str) -> Identity {
        Identity::from(name)
    }

    fn manager_with(accounts: &[(&str, Amount)]) -> AccountManager {
        let mut manager = AccountManager::new();
        for (owner, balance) in accounts {
            manager.open(&id(owner), *balance, 0).unwrap();
        }
        manager
    }

    #[test]
    fn test_new_creates_empty_manager() {
        let manager = AccountManager::new();
        assert_eq!(manager.accounts.len(), 0);
        assert_eq!(manager.get_all_accounts().len(), 0);
    }

    #[test]
    fn test_open_creates_active_account() {
        let mut manager = AccountManager::new();

        let account = manager.open(&id("alice"), 2_000_000, 42).unwrap();

        assert_eq!(account.owner, id("alice"));
        assert_eq!(account.balance, 2_000_000);
        assert_eq!(account.deposit_timestamp, 42);
        assert!(account.is_active);
        assert!(manager.contains(&id("alice")));
    }

    #[test]
    fn test_open_twice_fails_and_keeps_original() {
        let mut manager = manager_with(&[("alice", 2_000_000)]);

        let result = manager.open(&id("alice"), 5_000_000, 99);

        assert_eq!(
            result.unwrap_err(),
            LedgerError::account_already_exists(&id("alice"))
        );
        assert_eq!(manager.require(&id("alice")).unwrap().balance, 2_000_000);
        assert_eq!(manager.require(&id("alice")).unwrap().deposit_timestamp, 0);
    }

    #[test]
    fn test_require_missing_account() {
        let manager = AccountManager::new();
        assert_eq!(
            manager.require(&id("ghost")).unwrap_err(),
            LedgerError::account_not_found(&id("ghost"))
        );
    }

    #[test]
    fn test_require_active_rejects_inactive() {
        let mut manager = manager_with(&[("alice", 1_000_000)]);
        manager.set_active(&id("alice"), false);

        assert_eq!(
            manager.require_active(&id("alice"), "deposit").unwrap_err(),
            LedgerError::not_authorized(&id("alice"), "deposit")
        );
    }

    #[test]
    fn test_reset_balance_moves_anchor() {
        let mut manager = manager_with(&[("alice", 1_000_000)]);

        manager.reset_balance(&id("alice"), 3_000_000, 500).unwrap();

        let account = manager.require(&id("alice")).unwrap();
        assert_eq!(account.balance, 3_000_000);
        assert_eq!(account.deposit_timestamp, 500);
    }

    #[test]
    fn test_move_principal_preserves_sum_and_anchors() {
        let mut manager = AccountManager::new();
        manager.open(&id("alice"), 2_000_000, 10).unwrap();
        manager.open(&id("bob"), 1_000_000, 20).unwrap();
        let before = manager.total_principal();

        manager
            .move_principal(&id("alice"), &id("bob"), 750_000)
            .unwrap();

        let alice = manager.require(&id("alice")).unwrap();
        let bob = manager.require(&id("bob")).unwrap();
        assert_eq!(alice.balance, 1_250_000);
        assert_eq!(bob.balance, 1_750_000);
        assert_eq!(alice.deposit_timestamp, 10);
        assert_eq!(bob.deposit_timestamp, 20);
        assert_eq!(manager.total_principal(), before);
    }

    #[rstest]
    #[case::missing_sender("ghost", "bob", 1, LedgerError::account_not_found(&Identity::from("ghost")))]
    #[case::missing_recipient("alice", "ghost", 1, LedgerError::account_not_found(&Identity::from("ghost")))]
    #[case::insufficient("alice", "bob", 2_000_001, LedgerError::insufficient_balance(&Identity::from("alice"), 2_000_000, 2_000_001))]
    fn test_move_principal_errors_leave_balances(
        #[case] from: &str,
        #[case] to: &str,
        #[case] amount: Amount,
        #[case] expected: LedgerError,
    ) {
        let mut manager = manager_with(&[("alice", 2_000_000), ("bob", 1_000_000)]);

        let result = manager.move_principal(&id(from), &id(to), amount);

        assert_eq!(result.unwrap_err(), expected);
        assert_eq!(manager.require(&id("alice")).unwrap().balance, 2_000_000);
        assert_eq!(manager.require(&id("bob")).unwrap().balance, 1_000_000);
    }

    #[test]
    fn test_move_principal_rejects_inactive_recipient() {
        let mut manager = manager_with(&[("alice", 2_000_000), ("bob", 1_000_000)]);
        manager.set_active(&id("bob"), false);

        assert_eq!(
            manager
                .move_principal(&id("alice"), &id("bob"), 1)
                .unwrap_err(),
            LedgerError::not_authorized(&id("bob"), "transfer")
        );
    }

    #[test]
    fn test_move_principal_to_self_is_noop() {
        let mut manager = manager_with(&[("alice", 2_000_000)]);

        manager
            .move_principal(&id("alice"), &id("alice"), 2_000_000)
            .unwrap();

        assert_eq!(manager.require(&id("alice")).unwrap().balance, 2_000_000);
    }

    #[test]
    fn test_get_all_accounts_sorted_by_owner() {
        let manager = manager_with(&[("carol", 1), ("alice", 2), ("bob", 3)]);

        let owners: Vec<&str> = manager
            .get_all_accounts()
            .iter()
            .map(|account| account.owner.as_str())
            .collect();

        assert_eq!(owners, vec!["alice", "bob", "carol"]);
    }
}
