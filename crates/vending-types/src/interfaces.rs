//! Collaborator interfaces the machine calls into.
//!
//! The machine never owns custody or value state. It asks an
//! [`AssetRegistry`] who holds an item and tells it to move items, and it
//! asks a [`PaymentChannel`] to move value. Both calls are synchronous;
//! an `Err` aborts the enclosing operation.

use crate::{Address, Amount, ItemId, Result};

/// Ownership ledger for uniquely identified items.
pub trait AssetRegistry {
    /// Current holder of `item_id` in `registry`.
    fn owner_of(&self, registry: Address, item_id: ItemId) -> Result<Address>;

    /// Move `item_id` from `from` to `to`, acting as `operator`.
    ///
    /// Succeeds only if `from` is the current holder and `operator` is the
    /// holder or has been authorized by it.
    fn transfer_from(
        &mut self,
        operator: Address,
        registry: Address,
        from: Address,
        to: Address,
        item_id: ItemId,
    ) -> Result<()>;
}

/// Native value transfers.
pub trait PaymentChannel {
    /// Current value balance of `account`.
    fn balance_of(&self, account: Address) -> Amount;

    /// Move `amount` from `from` to `to`. Fails if `from` cannot cover it
    /// or `to` refuses value.
    fn transfer_value(&mut self, from: Address, to: Address, amount: Amount) -> Result<()>;
}
