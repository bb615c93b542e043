//! The sale machine.
//!
//! Sells exactly one asset, to exactly one buyer, for at least a fixed
//! price. The machine stores nothing but its address and its
//! [`SaleConfig`]: custody is read from the registry at the start of every
//! operation and value lives in the payment channel.
//!
//! ## Purchase settlement
//!
//! ```text
//! caller == buyer?          no → NotAuthorizedBuyer
//! value  >= price?          no → NotEnoughETH
//! registry.owner_of(asset)  == machine → transfer machine → recipient
//!                           otherwise  → transfer seller  → recipient (standing authorization)
//! forward the full value to the seller
//! ```
//!
//! Every step returns `Err` on failure. The caller runs the operation
//! inside one unit of work, so a failed step undoes the earlier ones.

use vending_types::{
    Address, Amount, AssetRef, AssetRegistry, CallContext, Custody, ItemId, PaymentChannel,
    PurchaseReceipt, Result, SaleConfig, VendingError,
};

/// An operation invoked on a machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineCall {
    /// Buy the asset for the buyer.
    Purchase,
    /// Buy the asset and deliver it to `recipient`.
    PurchaseFor { recipient: Address },
    /// Seller moves an item held by the machine to `recipient`.
    WithdrawNft {
        registry: Address,
        item_id: ItemId,
        recipient: Address,
    },
    /// Value sent with no operation.
    Receive,
}

impl MachineCall {
    /// Whether the operation accepts attached value.
    #[must_use]
    pub fn is_payable(&self) -> bool {
        matches!(self, Self::Purchase | Self::PurchaseFor { .. })
    }
}

/// What a successful call produced.
#[derive(Debug, Clone)]
pub enum CallOutcome {
    Purchased(PurchaseReceipt),
    Withdrawn,
}

/// A deployed fixed-price sale of one asset.
#[derive(Debug, Clone)]
pub struct SaleMachine {
    /// Address the machine is deployed at.
    address: Address,
    /// Sale parameters. Never reassigned.
    config: SaleConfig,
}

impl SaleMachine {
    /// Build a machine at `address`.
    ///
    /// # Errors
    /// Returns `Configuration` if the config fails validation or the
    /// machine would be its own seller or buyer.
    pub fn new(address: Address, config: SaleConfig) -> Result<Self> {
        config.validate()?;
        if address == config.seller || address == config.buyer {
            return Err(VendingError::Configuration(
                "machine cannot be its own seller or buyer".into(),
            ));
        }
        Ok(Self { address, config })
    }

    // -----------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------

    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    #[must_use]
    pub fn config(&self) -> &SaleConfig {
        &self.config
    }

    #[must_use]
    pub fn seller(&self) -> Address {
        self.config.seller
    }

    #[must_use]
    pub fn buyer(&self) -> Address {
        self.config.buyer
    }

    #[must_use]
    pub fn price(&self) -> Amount {
        self.config.price
    }

    #[must_use]
    pub fn asset(&self) -> AssetRef {
        self.config.asset()
    }

    /// Registry of the asset for sale.
    #[must_use]
    pub fn token_contract(&self) -> Address {
        self.config.asset_registry
    }

    /// Item id of the asset for sale.
    #[must_use]
    pub fn token_id(&self) -> ItemId {
        self.config.asset_id
    }

    /// Current custody of the asset, read fresh from `registry`.
    ///
    /// `None` when neither the machine nor the seller holds it.
    pub fn custody<R: AssetRegistry + ?Sized>(&self, registry: &R) -> Result<Option<Custody>> {
        let asset = self.asset();
        let holder = registry.owner_of(asset.registry, asset.item_id)?;
        Ok(if holder == self.address {
            Some(Custody::Machine)
        } else if holder == self.config.seller {
            Some(Custody::Seller)
        } else {
            None
        })
    }

    // -----------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------

    /// Route `call` to its operation.
    ///
    /// Value attached to a non-payable operation is refused.
    pub fn dispatch<L>(&self, ledger: &mut L, ctx: &CallContext, call: MachineCall) -> Result<CallOutcome>
    where
        L: AssetRegistry + PaymentChannel + ?Sized,
    {
        self.ensure_target(ctx)?;
        if ctx.carries_value() && !call.is_payable() {
            return self.receive(ctx);
        }
        match call {
            MachineCall::Purchase => self.purchase(ledger, ctx).map(CallOutcome::Purchased),
            MachineCall::PurchaseFor { recipient } => self
                .purchase_for(ledger, ctx, recipient)
                .map(CallOutcome::Purchased),
            MachineCall::WithdrawNft {
                registry,
                item_id,
                recipient,
            } => self
                .withdraw_nft(ledger, ctx, registry, item_id, recipient)
                .map(|()| CallOutcome::Withdrawn),
            MachineCall::Receive => self.receive(ctx),
        }
    }

    /// Buy the asset for the buyer.
    ///
    /// `ctx.value` must already be credited to the machine.
    pub fn purchase<L>(&self, ledger: &mut L, ctx: &CallContext) -> Result<PurchaseReceipt>
    where
        L: AssetRegistry + PaymentChannel + ?Sized,
    {
        self.settle(ledger, ctx, self.config.buyer)
    }

    /// Buy the asset and deliver it to `recipient`. Payment and
    /// authorization are still the buyer's.
    pub fn purchase_for<L>(
        &self,
        ledger: &mut L,
        ctx: &CallContext,
        recipient: Address,
    ) -> Result<PurchaseReceipt>
    where
        L: AssetRegistry + PaymentChannel + ?Sized,
    {
        self.settle(ledger, ctx, recipient)
    }

    /// Registry callback for an item pushed into the machine.
    ///
    /// `ctx.caller` is the registry performing the push. Only the configured
    /// asset is accepted; anything else fails so the registry undoes the push.
    pub fn on_asset_received(
        &self,
        ctx: &CallContext,
        operator: Address,
        from: Address,
        item_id: ItemId,
        data: &[u8],
    ) -> Result<()> {
        if !self.asset().matches(ctx.caller, item_id) {
            tracing::warn!(
                machine = %self.address,
                registry = %ctx.caller,
                item = %item_id,
                from = %from,
                "Deposit rejected: not the asset for sale"
            );
            return Err(VendingError::NotSellingThisNft {
                registry: ctx.caller,
                item_id,
            });
        }
        tracing::info!(
            machine = %self.address,
            item = %item_id,
            from = %from,
            operator = %operator,
            data_len = data.len(),
            "Deposit accepted"
        );
        Ok(())
    }

    /// Seller moves an item held by the machine to `recipient`.
    ///
    /// Works for any item the machine holds, not only the one for sale.
    pub fn withdraw_nft<R>(
        &self,
        ledger: &mut R,
        ctx: &CallContext,
        registry: Address,
        item_id: ItemId,
        recipient: Address,
    ) -> Result<()>
    where
        R: AssetRegistry + ?Sized,
    {
        if ctx.caller != self.config.seller {
            return Err(VendingError::NotAuthorized { caller: ctx.caller });
        }
        ledger.transfer_from(self.address, registry, self.address, recipient, item_id)?;
        tracing::info!(
            machine = %self.address,
            registry = %registry,
            item = %item_id,
            recipient = %recipient,
            "Item withdrawn"
        );
        Ok(())
    }

    /// Value sent with no operation. Always refused.
    pub fn receive(&self, ctx: &CallContext) -> Result<CallOutcome> {
        tracing::warn!(
            machine = %self.address,
            from = %ctx.caller,
            amount = %ctx.value,
            "Bare value rejected"
        );
        Err(VendingError::ValueRejected {
            recipient: self.address,
        })
    }

    // -----------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------

    fn settle<L>(&self, ledger: &mut L, ctx: &CallContext, recipient: Address) -> Result<PurchaseReceipt>
    where
        L: AssetRegistry + PaymentChannel + ?Sized,
    {
        if ctx.caller != self.config.buyer {
            return Err(VendingError::NotAuthorizedBuyer { caller: ctx.caller });
        }
        if ctx.value < self.config.price {
            return Err(VendingError::NotEnoughEth {
                price: self.config.price,
                sent: ctx.value,
            });
        }

        let asset = self.asset();
        let (from, source) = self.resolve_source(ledger)?;
        tracing::debug!(
            machine = %self.address,
            custody = %source,
            from = %from,
            recipient = %recipient,
            "Custody resolved"
        );

        // A holder that is neither party fails here, inside the registry.
        ledger.transfer_from(self.address, asset.registry, from, recipient, asset.item_id)?;
        ledger.transfer_value(self.address, self.config.seller, ctx.value)?;

        let receipt =
            PurchaseReceipt::new(self.address, asset, ctx.caller, recipient, source, ctx.value);
        tracing::info!(
            machine = %self.address,
            receipt = %receipt.id,
            asset = %asset,
            recipient = %recipient,
            custody = %source,
            amount = %ctx.value,
            "Purchase settled"
        );
        Ok(receipt)
    }

    /// Where to pull the asset from: the machine if it holds it, else the seller.
    fn resolve_source<R>(&self, registry: &R) -> Result<(Address, Custody)>
    where
        R: AssetRegistry + ?Sized,
    {
        let asset = self.asset();
        let holder = registry.owner_of(asset.registry, asset.item_id)?;
        if holder == self.address {
            Ok((self.address, Custody::Machine))
        } else {
            Ok((self.config.seller, Custody::Seller))
        }
    }

    fn ensure_target(&self, ctx: &CallContext) -> Result<()> {
        if ctx.this == self.address {
            Ok(())
        } else {
            Err(VendingError::Internal(format!(
                "call for {} routed to machine {}",
                ctx.this, self.address
            )))
        }
    }
}
