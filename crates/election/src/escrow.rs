use std::collections::BTreeMap;

use primitives::{Address, Balance};
use serde::{Deserialize, Serialize};

use crate::{ElectionError, FundsSink, Result};

/// Candidate deposits held by the candidate registry, keyed by the account
/// that paid them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Escrow {
    held: BTreeMap<Address, Balance>,
    total: Balance,
}

impl Escrow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hold(&mut self, account: Address, amount: Balance) -> Result<()> {
        let total = self
            .total
            .checked_add(amount)
            .ok_or(ElectionError::Overflow("escrow total"))?;

        let held = self.held.entry(account).or_default();
        *held = held
            .checked_add(amount)
            .ok_or(ElectionError::Overflow("escrowed deposit"))?;

        self.total = total;

        Ok(())
    }

    /// Takes everything held for `account` out of escrow, returning the
    /// amount released. Releasing an account with nothing held yields zero.
    pub fn release(&mut self, account: &Address) -> Balance {
        let amount = self.held.remove(account).unwrap_or_default();
        self.total = self.total.saturating_sub(amount);
        amount
    }

    pub fn held_by(&self, account: &Address) -> Balance {
        self.held.get(account).copied().unwrap_or_default()
    }

    pub fn total(&self) -> Balance {
        self.total
    }

    /// Whether escrow holds exactly `expected` per account, ignoring empty
    /// holdings, and the running total agrees with what is held.
    pub fn holds_exactly(&self, expected: &BTreeMap<Address, Balance>) -> bool {
        let held = self.held.iter().filter(|(_, amount)| **amount > 0);
        let wanted = expected.iter().filter(|(_, amount)| **amount > 0);
        let sum = self
            .held
            .values()
            .try_fold(0, |acc: Balance, amount| acc.checked_add(*amount));

        held.eq(wanted) && sum == Some(self.total)
    }
}

/// Host account balances in base units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balances {
    accounts: BTreeMap<Address, Balance>,
}

impl Balances {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, account: &Address) -> Balance {
        self.accounts.get(account).copied().unwrap_or_default()
    }

    pub fn debit(&mut self, account: &Address, amount: Balance) -> Result<()> {
        let available = self.balance_of(account);
        if available < amount {
            return Err(ElectionError::InsufficientFunds {
                account: *account,
                required: amount,
                available,
            });
        }

        self.accounts.insert(*account, available - amount);

        Ok(())
    }

    pub fn total(&self) -> Balance {
        self.accounts
            .values()
            .fold(0, |acc: Balance, amount| acc.saturating_add(*amount))
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl FundsSink for Balances {
    fn credit(&mut self, account: &Address, amount: Balance) -> Result<()> {
        let balance = self
            .balance_of(account)
            .checked_add(amount)
            .ok_or(ElectionError::Overflow("account balance"))?;

        self.accounts.insert(*account, balance);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escrow_tracks_holdings_and_total() {
        let mut escrow = Escrow::new();
        let alice = Address::from_seed("alice");
        let bob = Address::from_seed("bob");

        escrow.hold(alice, 10).unwrap();
        escrow.hold(bob, 5).unwrap();

        assert_eq!(escrow.held_by(&alice), 10);
        assert_eq!(escrow.total(), 15);

        assert_eq!(escrow.release(&alice), 10);
        assert_eq!(escrow.release(&alice), 0);
        assert_eq!(escrow.total(), 5);
    }

    #[test]
    fn holdings_compare_against_expected_deposits() {
        let mut escrow = Escrow::new();
        let alice = Address::from_seed("alice");
        let bob = Address::from_seed("bob");
        escrow.hold(alice, 10).unwrap();

        let mut expected = BTreeMap::from([(alice, 10), (bob, 0)]);
        assert!(escrow.holds_exactly(&expected));

        expected.insert(bob, 3);
        assert!(!escrow.holds_exactly(&expected));

        assert!(!escrow.holds_exactly(&BTreeMap::new()));
    }

    #[test]
    fn escrow_overflow_leaves_state_unchanged() {
        let mut escrow = Escrow::new();
        let alice = Address::from_seed("alice");

        escrow.hold(alice, Balance::MAX).unwrap();
        assert_eq!(
            escrow.hold(Address::from_seed("bob"), 1),
            Err(ElectionError::Overflow("escrow total"))
        );
        assert_eq!(escrow.total(), Balance::MAX);
        assert_eq!(escrow.held_by(&Address::from_seed("bob")), 0);
    }

    #[test]
    fn debit_requires_sufficient_funds() {
        let mut balances = Balances::new();
        let alice = Address::from_seed("alice");

        balances.credit(&alice, 100).unwrap();
        balances.debit(&alice, 40).unwrap();
        assert_eq!(balances.balance_of(&alice), 60);

        let err = balances.debit(&alice, 61).unwrap_err();
        assert_eq!(
            err,
            ElectionError::InsufficientFunds {
                account: alice,
                required: 61,
                available: 60
            }
        );
        assert_eq!(balances.balance_of(&alice), 60);
    }

    #[test]
    fn credit_rejects_overflow() {
        let mut balances = Balances::new();
        let alice = Address::from_seed("alice");

        balances.credit(&alice, Balance::MAX).unwrap();
        assert!(balances.credit(&alice, 1).is_err());
        assert_eq!(balances.total(), Balance::MAX);
    }
}
