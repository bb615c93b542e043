//! Sale parameters, fixed when a machine is deployed.

use serde::{Deserialize, Serialize};

use crate::{Address, Amount, AssetRef, ItemId, Result, VendingError, amount, constants};

/// The immutable parameters of one sale.
///
/// Supplied once at deployment. No operation ever reassigns a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleConfig {
    /// Receives the payment and is the only party allowed to withdraw.
    pub seller: Address,
    /// The only party allowed to purchase.
    pub buyer: Address,
    /// Minimum payment, in base units. Overpayment is forwarded in full.
    pub price: Amount,
    /// Registry tracking the asset for sale.
    pub asset_registry: Address,
    /// Item id of the asset for sale.
    pub asset_id: ItemId,
}

impl SaleConfig {
    #[must_use]
    pub fn new(
        seller: Address,
        buyer: Address,
        price: Amount,
        asset_registry: Address,
        asset_id: ItemId,
    ) -> Self {
        Self {
            seller,
            buyer,
            price,
            asset_registry,
            asset_id,
        }
    }

    /// Parameters of the reference deployment: 110 ether for item 48.
    #[must_use]
    pub fn reference(seller: Address, buyer: Address, asset_registry: Address) -> Self {
        Self::new(
            seller,
            buyer,
            amount::ether(constants::DEFAULT_PRICE_ETHER),
            asset_registry,
            ItemId(constants::DEFAULT_ITEM_ID),
        )
    }

    /// Load and validate a config from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// The asset being sold.
    #[must_use]
    pub fn asset(&self) -> AssetRef {
        AssetRef::new(self.asset_registry, self.asset_id)
    }

    /// Check the parameters before a machine is built from them.
    ///
    /// # Errors
    /// Returns `Configuration` if the price is negative or fractional, or
    /// any address is zero.
    pub fn validate(&self) -> Result<()> {
        if amount::ensure_transferable(self.price).is_err() {
            return Err(VendingError::Configuration(format!(
                "price must be a non-negative whole number of base units, got {}",
                self.price
            )));
        }
        for (field, addr) in [
            ("seller", self.seller),
            ("buyer", self.buyer),
            ("asset_registry", self.asset_registry),
        ] {
            if addr.is_zero() {
                return Err(VendingError::Configuration(format!(
                    "{field} must not be the zero address"
                )));
            }
        }
        Ok(())
    }
}
