//! In-memory custody collaborator
//!
//! Keeps external balances for every identity (including the custody pool)
//! in a HashMap. Used by the script driver and by tests.

use crate::core::traits::Custody;
use crate::types::{Amount, CustodyError, Identity};
use std::collections::HashMap;

/// External wallets backed by a HashMap
#[derive(Debug, Clone, Default)]
pub struct InMemoryCustody {
    balances: HashMap<Identity, Amount>,
}

impl InMemoryCustody {
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
        }
    }

    /// Credit external funds to `identity`
    ///
    /// This mints units out of thin air and is meant for seeding wallets,
    /// never for ledger operations.
    pub fn fund(&mut self, identity: &Identity, amount: Amount) -> Result<(), CustodyError> {
        let balance = self.balances.entry(identity.clone()).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| CustodyError::Overflow {
                identity: identity.clone(),
            })?;
        Ok(())
    }
}

impl Custody for InMemoryCustody {
    fn transfer(
        &mut self,
        amount: Amount,
        from: &Identity,
        to: &Identity,
    ) -> Result<(), CustodyError> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(CustodyError::InsufficientFunds {
                identity: from.clone(),
                available,
                requested: amount,
            });
        }

        if from == to {
            return Ok(());
        }

        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or_else(|| CustodyError::Overflow {
                identity: to.clone(),
            })?;

        self.balances.insert(from.clone(), available - amount);
        self.balances.insert(to.clone(), credited);
        Ok(())
    }

    fn balance_of(&self, identity: &Identity) -> Amount {
        self.balances.get(identity).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fund_credits_wallet() {
        let mut custody = InMemoryCustody::new();
        let alice = Identity::from("alice");

        custody.fund(&alice, 100).unwrap();
        custody.fund(&alice, 50).unwrap();

        assert_eq!(custody.balance_of(&alice), 150);
        assert_eq!(custody.balance_of(&Identity::from("bob")), 0);
    }

    #[test]
    fn test_transfer_moves_funds() {
        let mut custody = InMemoryCustody::new();
        let alice = Identity::from("alice");
        let pool = Identity::from("pool");
        custody.fund(&alice, 100).unwrap();

        custody.transfer(60, &alice, &pool).unwrap();

        assert_eq!(custody.balance_of(&alice), 40);
        assert_eq!(custody.balance_of(&pool), 60);
    }

    #[test]
    fn test_transfer_fails_without_effect() {
        let mut custody = InMemoryCustody::new();
        let alice = Identity::from("alice");
        let pool = Identity::from("pool");
        custody.fund(&alice, 100).unwrap();

        let result = custody.transfer(101, &alice, &pool);

        assert_eq!(
            result,
            Err(CustodyError::InsufficientFunds {
                identity: alice.clone(),
                available: 100,
                requested: 101,
            })
        );
        assert_eq!(custody.balance_of(&alice), 100);
        assert_eq!(custody.balance_of(&pool), 0);
    }

    #[test]
    fn test_transfer_overflow_is_rejected() {
        let mut custody = InMemoryCustody::new();
        let alice = Identity::from("alice");
        let pool = Identity::from("pool");
        custody.fund(&alice, 10).unwrap();
        custody.fund(&pool, Amount::MAX).unwrap();

        assert!(matches!(
            custody.transfer(10, &alice, &pool),
            Err(CustodyError::Overflow { .. })
        ));
        assert_eq!(custody.balance_of(&alice), 10);
    }
}
