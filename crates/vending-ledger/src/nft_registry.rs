//! Ownership registry for one collection of uniquely identified items.
//!
//! Tracks the holder of every item plus two kinds of standing authorization:
//! a per-item approved address and per-owner blanket operators. A transfer
//! by a third party succeeds only under one of those authorizations, and
//! the per-item approval is cleared whenever the item moves.

use std::collections::{HashMap, HashSet};

use vending_types::{Address, Event, ItemId, Result, VendingError};

/// One collection of items and their holders.
#[derive(Debug, Clone)]
pub struct NftRegistry {
    /// Address this registry is deployed at.
    address: Address,
    /// Current holder of each item.
    owners: HashMap<ItemId, Address>,
    /// Per-item approved address.
    approvals: HashMap<ItemId, Address>,
    /// `(owner, operator)` pairs with blanket authorization.
    operators: HashSet<(Address, Address)>,
}

impl NftRegistry {
    /// Create an empty registry deployed at `address`.
    #[must_use]
    pub fn new(address: Address) -> Self {
        Self {
            address,
            owners: HashMap::new(),
            approvals: HashMap::new(),
            operators: HashSet::new(),
        }
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// Create `item_id` held by `to`.
    ///
    /// # Errors
    /// - `TransferFailed` if `to` is the zero address
    /// - `ItemAlreadyExists` if the id is taken
    pub fn mint(&mut self, to: Address, item_id: ItemId) -> Result<Event> {
        if to.is_zero() {
            return Err(VendingError::TransferFailed {
                reason: "mint to the zero address".into(),
            });
        }
        if self.owners.contains_key(&item_id) {
            return Err(VendingError::ItemAlreadyExists {
                registry: self.address,
                item_id,
            });
        }
        self.owners.insert(item_id, to);
        Ok(Event::Transfer {
            registry: self.address,
            from: Address::ZERO,
            to,
            item_id,
        })
    }

    /// Current holder of `item_id`.
    ///
    /// # Errors
    /// Returns `ItemNotFound` if the item was never minted.
    pub fn owner_of(&self, item_id: ItemId) -> Result<Address> {
        self.owners
            .get(&item_id)
            .copied()
            .ok_or(VendingError::ItemNotFound {
                registry: self.address,
                item_id,
            })
    }

    /// Address approved to move `item_id`, if any.
    #[must_use]
    pub fn get_approved(&self, item_id: ItemId) -> Option<Address> {
        self.approvals.get(&item_id).copied()
    }

    #[must_use]
    pub fn is_approved_for_all(&self, owner: Address, operator: Address) -> bool {
        self.operators.contains(&(owner, operator))
    }

    /// Approve `approved` to move `item_id`. `ZERO` clears the approval.
    ///
    /// # Errors
    /// - `ItemNotFound` if the item does not exist
    /// - `TransferFailed` if `caller` is neither the holder nor its operator,
    ///   or if the holder approves itself
    pub fn approve(&mut self, caller: Address, approved: Address, item_id: ItemId) -> Result<Event> {
        let owner = self.owner_of(item_id)?;
        if approved == owner {
            return Err(VendingError::TransferFailed {
                reason: "approval to current owner".into(),
            });
        }
        if caller != owner && !self.is_approved_for_all(owner, caller) {
            return Err(VendingError::TransferFailed {
                reason: "approve caller is not owner nor approved for all".into(),
            });
        }
        if approved.is_zero() {
            self.approvals.remove(&item_id);
        } else {
            self.approvals.insert(item_id, approved);
        }
        Ok(Event::Approval {
            registry: self.address,
            owner,
            approved,
            item_id,
        })
    }

    /// Grant or revoke blanket authorization for `operator` over `owner`'s items.
    ///
    /// # Errors
    /// Returns `TransferFailed` if `owner == operator`.
    pub fn set_approval_for_all(
        &mut self,
        owner: Address,
        operator: Address,
        approved: bool,
    ) -> Result<Event> {
        if owner == operator {
            return Err(VendingError::TransferFailed {
                reason: "approve to caller".into(),
            });
        }
        if approved {
            self.operators.insert((owner, operator));
        } else {
            self.operators.remove(&(owner, operator));
        }
        Ok(Event::ApprovalForAll {
            registry: self.address,
            owner,
            operator,
            approved,
        })
    }

    /// Move `item_id` from `from` to `to`, acting as `operator`.
    ///
    /// # Errors
    /// - `ItemNotFound` if the item does not exist
    /// - `TransferFailed` if `from` is not the holder, `to` is zero, or
    ///   `operator` holds no authorization
    pub fn transfer_from(
        &mut self,
        operator: Address,
        from: Address,
        to: Address,
        item_id: ItemId,
    ) -> Result<Event> {
        let owner = self.owner_of(item_id)?;
        if owner != from {
            return Err(VendingError::TransferFailed {
                reason: format!("transfer of {item_id} from incorrect owner {from}"),
            });
        }
        if to.is_zero() {
            return Err(VendingError::TransferFailed {
                reason: "transfer to the zero address".into(),
            });
        }
        let authorized = operator == owner
            || self.get_approved(item_id) == Some(operator)
            || self.is_approved_for_all(owner, operator);
        if !authorized {
            return Err(VendingError::TransferFailed {
                reason: format!("{operator} is not owner nor approved for {item_id}"),
            });
        }

        self.approvals.remove(&item_id);
        self.owners.insert(item_id, to);
        Ok(Event::Transfer {
            registry: self.address,
            from,
            to,
            item_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (NftRegistry, Address, Address) {
        let mut reg = NftRegistry::new(Address::from_label("registry"));
        let alice = Address::random();
        let bob = Address::random();
        reg.mint(alice, ItemId(1)).unwrap();
        (reg, alice, bob)
    }

    #[test]
    fn mint_assigns_owner() {
        let (reg, alice, _) = setup();
        assert_eq!(reg.owner_of(ItemId(1)).unwrap(), alice);
    }

    #[test]
    fn duplicate_mint_rejected() {
        let (mut reg, _, bob) = setup();
        let err = reg.mint(bob, ItemId(1)).unwrap_err();
        assert!(matches!(err, VendingError::ItemAlreadyExists { .. }));
    }

    #[test]
    fn mint_to_zero_rejected() {
        let (mut reg, _, _) = setup();
        assert!(reg.mint(Address::ZERO, ItemId(2)).is_err());
    }

    #[test]
    fn unknown_item_not_found() {
        let (reg, _, _) = setup();
        let err = reg.owner_of(ItemId(99)).unwrap_err();
        assert!(matches!(err, VendingError::ItemNotFound { .. }));
    }

    #[test]
    fn owner_can_transfer() {
        let (mut reg, alice, bob) = setup();
        let ev = reg.transfer_from(alice, alice, bob, ItemId(1)).unwrap();
        assert!(ev.is_transfer(reg.address(), alice, bob, ItemId(1)));
        assert_eq!(reg.owner_of(ItemId(1)).unwrap(), bob);
    }

    #[test]
    fn stranger_cannot_transfer() {
        let (mut reg, alice, bob) = setup();
        let err = reg.transfer_from(bob, alice, bob, ItemId(1)).unwrap_err();
        assert!(err.is_transfer_failure());
        assert_eq!(reg.owner_of(ItemId(1)).unwrap(), alice);
    }

    #[test]
    fn approved_address_can_transfer_once() {
        let (mut reg, alice, bob) = setup();
        let carol = Address::random();
        reg.approve(alice, bob, ItemId(1)).unwrap();
        assert_eq!(reg.get_approved(ItemId(1)), Some(bob));

        reg.transfer_from(bob, alice, carol, ItemId(1)).unwrap();
        assert_eq!(reg.owner_of(ItemId(1)).unwrap(), carol);
        // Approval cleared by the move.
        assert_eq!(reg.get_approved(ItemId(1)), None);
        assert!(reg.transfer_from(bob, carol, bob, ItemId(1)).is_err());
    }

    #[test]
    fn clearing_approval_revokes_it() {
        let (mut reg, alice, bob) = setup();
        reg.approve(alice, bob, ItemId(1)).unwrap();
        reg.approve(alice, Address::ZERO, ItemId(1)).unwrap();
        assert!(reg.transfer_from(bob, alice, bob, ItemId(1)).is_err());
    }

    #[test]
    fn operator_can_transfer_and_approve() {
        let (mut reg, alice, bob) = setup();
        let carol = Address::random();
        reg.set_approval_for_all(alice, bob, true).unwrap();
        assert!(reg.is_approved_for_all(alice, bob));

        reg.approve(bob, carol, ItemId(1)).unwrap();
        reg.transfer_from(bob, alice, carol, ItemId(1)).unwrap();
        assert_eq!(reg.owner_of(ItemId(1)).unwrap(), carol);

        reg.set_approval_for_all(alice, bob, false).unwrap();
        assert!(!reg.is_approved_for_all(alice, bob));
    }

    #[test]
    fn wrong_from_rejected_even_when_approved() {
        let (mut reg, alice, bob) = setup();
        reg.approve(alice, bob, ItemId(1)).unwrap();
        let err = reg.transfer_from(bob, bob, bob, ItemId(1)).unwrap_err();
        assert!(matches!(err, VendingError::TransferFailed { .. }));
    }

    #[test]
    fn transfer_to_zero_rejected() {
        let (mut reg, alice, _) = setup();
        assert!(reg.transfer_from(alice, alice, Address::ZERO, ItemId(1)).is_err());
    }

    #[test]
    fn self_approval_rejected() {
        let (mut reg, alice, _) = setup();
        assert!(reg.approve(alice, alice, ItemId(1)).is_err());
        assert!(reg.set_approval_for_all(alice, alice, true).is_err());
    }

    #[test]
    fn non_owner_cannot_approve() {
        let (mut reg, alice, bob) = setup();
        assert!(reg.approve(bob, bob, ItemId(1)).is_err());
        assert!(reg.approve(bob, Address::random(), ItemId(1)).is_err());
        assert_eq!(reg.owner_of(ItemId(1)).unwrap(), alice);
    }
}
