//! The combined ledger: registries, value balances, and the event log.
//!
//! [`Ledger::transact`] is the unit of work. It snapshots the whole ledger,
//! runs the closure, and restores the snapshot if the closure fails, so a
//! multi-step operation either lands completely or leaves no trace
//! (events included).

use std::collections::BTreeMap;

use vending_types::{
    Address, Amount, AssetRegistry, Event, ItemId, PaymentChannel, Result, VendingError,
};

use crate::native::NativeLedger;
use crate::nft_registry::NftRegistry;

/// Every registry and account balance, plus the log of committed events.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    /// Registries by deployed address.
    registries: BTreeMap<Address, NftRegistry>,
    /// Native value balances.
    native: NativeLedger,
    /// Append-only event log.
    events: Vec<Event>,
}

impl Ledger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` as one all-or-nothing unit of work.
    ///
    /// On `Err` every registry, balance and event is restored to its state
    /// before the call.
    pub fn transact<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let snapshot = self.clone();
        let result = f(self);
        if let Err(err) = &result {
            tracing::debug!(error = %err, "Unit of work rolled back");
            *self = snapshot;
        }
        result
    }

    // -----------------------------------------------------------------
    // Registries
    // -----------------------------------------------------------------

    /// Deploy an empty registry at `address`.
    ///
    /// # Errors
    /// Returns `Configuration` if a registry already lives there.
    pub fn deploy_registry(&mut self, address: Address) -> Result<()> {
        if self.registries.contains_key(&address) {
            return Err(VendingError::Configuration(format!(
                "registry already deployed at {address}"
            )));
        }
        self.registries.insert(address, NftRegistry::new(address));
        Ok(())
    }

    /// The registry deployed at `address`.
    ///
    /// # Errors
    /// Returns `UnknownRegistry` if none is deployed there.
    pub fn registry(&self, address: Address) -> Result<&NftRegistry> {
        self.registries
            .get(&address)
            .ok_or(VendingError::UnknownRegistry(address))
    }

    fn registry_mut(&mut self, address: Address) -> Result<&mut NftRegistry> {
        self.registries
            .get_mut(&address)
            .ok_or(VendingError::UnknownRegistry(address))
    }

    /// Mint `item_id` in `registry` to `to`.
    pub fn mint(&mut self, registry: Address, to: Address, item_id: ItemId) -> Result<()> {
        let event = self.registry_mut(registry)?.mint(to, item_id)?;
        self.events.push(event);
        Ok(())
    }

    /// Approve `approved` to move `item_id`, as `caller`.
    pub fn approve(
        &mut self,
        caller: Address,
        registry: Address,
        approved: Address,
        item_id: ItemId,
    ) -> Result<()> {
        let event = self
            .registry_mut(registry)?
            .approve(caller, approved, item_id)?;
        self.events.push(event);
        Ok(())
    }

    /// Grant or revoke blanket authorization for `operator` over `caller`'s items.
    pub fn set_approval_for_all(
        &mut self,
        caller: Address,
        registry: Address,
        operator: Address,
        approved: bool,
    ) -> Result<()> {
        let event = self
            .registry_mut(registry)?
            .set_approval_for_all(caller, operator, approved)?;
        self.events.push(event);
        Ok(())
    }

    // -----------------------------------------------------------------
    // Native value
    // -----------------------------------------------------------------

    /// Read access to value balances.
    #[must_use]
    pub fn native(&self) -> &NativeLedger {
        &self.native
    }

    /// Fund `account` with freshly minted value.
    pub fn fund(&mut self, account: Address, value: Amount) -> Result<()> {
        self.native.mint_value(account, value)
    }

    /// Flag `account` as refusing plain value transfers.
    pub fn set_rejects_value(&mut self, account: Address, rejects: bool) {
        self.native.set_rejects_value(account, rejects);
    }

    /// Move the value attached to a call from `caller` into `callee`.
    pub fn attach_value(&mut self, caller: Address, callee: Address, value: Amount) -> Result<()> {
        self.native.attach(caller, callee, value)?;
        if !value.is_zero() {
            self.events.push(Event::ValueTransfer {
                from: caller,
                to: callee,
                amount: value,
            });
        }
        Ok(())
    }

    // -----------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------

    /// All committed events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Events recorded after the first `mark` entries.
    #[must_use]
    pub fn events_since(&self, mark: usize) -> &[Event] {
        self.events.get(mark..).unwrap_or_default()
    }
}

impl AssetRegistry for Ledger {
    fn owner_of(&self, registry: Address, item_id: ItemId) -> Result<Address> {
        self.registry(registry)?.owner_of(item_id)
    }

    fn transfer_from(
        &mut self,
        operator: Address,
        registry: Address,
        from: Address,
        to: Address,
        item_id: ItemId,
    ) -> Result<()> {
        let event = self
            .registry_mut(registry)?
            .transfer_from(operator, from, to, item_id)?;
        tracing::debug!(
            registry = %registry,
            item = %item_id,
            from = %from,
            to = %to,
            operator = %operator,
            "Item transferred"
        );
        self.events.push(event);
        Ok(())
    }
}

impl PaymentChannel for Ledger {
    fn balance_of(&self, account: Address) -> Amount {
        self.native.balance(account)
    }

    fn transfer_value(&mut self, from: Address, to: Address, value: Amount) -> Result<()> {
        self.native.transfer(from, to, value)?;
        tracing::debug!(from = %from, to = %to, amount = %value, "Value transferred");
        if !value.is_zero() {
            self.events.push(Event::ValueTransfer {
                from,
                to,
                amount: value,
            });
        }
        Ok(())
    }
}
