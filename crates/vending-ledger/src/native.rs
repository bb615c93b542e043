//! Native value balances.
//!
//! Tracks one value balance per account. All mutations are atomic: either
//! the full operation succeeds or the balances are unchanged. Accounts can
//! be flagged as refusing plain value transfers, which is how contracts
//! without a value-accepting entry point behave.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use vending_types::{Address, Amount, Result, VendingError, amount};

/// Value balances plus the set of accounts that refuse plain transfers.
#[derive(Debug, Clone, Default)]
pub struct NativeLedger {
    /// Per-account balances.
    balances: HashMap<Address, Amount>,
    /// Accounts that refuse value sent by [`NativeLedger::transfer`].
    rejecting: HashSet<Address>,
    /// Total value ever minted. Transfers never change it.
    minted: Amount,
}

impl NativeLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create value out of thin air for `account` (fixtures, genesis funding).
    ///
    /// # Errors
    /// Returns `InvalidAmount` for negative or fractional amounts, or if the
    /// total supply would overflow.
    pub fn mint_value(&mut self, account: Address, value: Amount) -> Result<()> {
        let value = amount::ensure_transferable(value)?;
        let minted = self
            .minted
            .checked_add(value)
            .ok_or(VendingError::InvalidAmount(value))?;
        let balance = self
            .balance(account)
            .checked_add(value)
            .ok_or(VendingError::InvalidAmount(value))?;
        self.balances.insert(account, balance);
        self.minted = minted;
        Ok(())
    }

    /// Current balance of `account`.
    #[must_use]
    pub fn balance(&self, account: Address) -> Amount {
        self.balances.get(&account).copied().unwrap_or(Decimal::ZERO)
    }

    /// Flag (or unflag) `account` as refusing plain value transfers.
    pub fn set_rejects_value(&mut self, account: Address, rejects: bool) {
        if rejects {
            self.rejecting.insert(account);
        } else {
            self.rejecting.remove(&account);
        }
    }

    #[must_use]
    pub fn rejects_value(&self, account: Address) -> bool {
        self.rejecting.contains(&account)
    }

    /// Plain value transfer. Refused if `to` rejects value.
    ///
    /// # Errors
    /// - `InvalidAmount` for negative or fractional amounts
    /// - `ValueRejected` if `to` refuses value
    /// - `InsufficientBalance` if `from` cannot cover `value`
    pub fn transfer(&mut self, from: Address, to: Address, value: Amount) -> Result<()> {
        if self.rejects_value(to) && !value.is_zero() {
            return Err(VendingError::ValueRejected { recipient: to });
        }
        self.attach(from, to, value)
    }

    /// Value attached to a call into `to`.
    ///
    /// Skips the recipient's refusal flag: the call's own entry point
    /// decides whether to keep the value, and fails the call otherwise.
    ///
    /// # Errors
    /// - `InvalidAmount` for negative or fractional amounts
    /// - `InsufficientBalance` if `from` cannot cover `value`
    pub fn attach(&mut self, from: Address, to: Address, value: Amount) -> Result<()> {
        let value = amount::ensure_transferable(value)?;
        if value.is_zero() {
            return Ok(());
        }
        let available = self.balance(from);
        if available < value {
            return Err(VendingError::InsufficientBalance {
                account: from,
                needed: value,
                available,
            });
        }
        *self.balances.entry(from).or_insert(Decimal::ZERO) -= value;
        *self.balances.entry(to).or_insert(Decimal::ZERO) += value;
        Ok(())
    }

    /// Sum of all balances.
    #[must_use]
    pub fn total_supply(&self) -> Amount {
        self.balances.values().copied().sum()
    }

    /// Check that transfers have neither created nor destroyed value.
    ///
    /// # Errors
    /// Returns `Internal` if the sum of balances differs from total minted.
    pub fn verify_supply(&self) -> Result<()> {
        let actual = self.total_supply();
        if actual != self.minted {
            return Err(VendingError::Internal(format!(
                "supply invariant violated: balances sum to {actual}, minted {}",
                self.minted
            )));
        }
        Ok(())
    }
}
