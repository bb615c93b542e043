//! Error types for the vending machine.
//!
//! All errors use the `VM_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Authorization errors
//! - 2xx: Payment / value errors
//! - 3xx: Asset registry errors
//! - 4xx: Deposit errors
//! - 5xx: Host errors
//! - 9xx: General / internal errors
//!
//! Every error rejects the whole enclosing call. Nothing a failed call did
//! survives it.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{Address, ItemId};

/// Central error enum for all vending operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VendingError {
    // =================================================================
    // Authorization Errors (1xx)
    // =================================================================
    /// A purchase-class call came from someone other than the configured buyer.
    #[error("VM_ERR_100: NotAuthorizedBuyer: {caller} is not the buyer")]
    NotAuthorizedBuyer { caller: Address },

    /// A withdrawal came from someone other than the configured seller.
    #[error("VM_ERR_101: NotAuthorized: {caller} is not the seller")]
    NotAuthorized { caller: Address },

    // =================================================================
    // Payment Errors (2xx)
    // =================================================================
    /// The value attached to a purchase is below the price.
    #[error("VM_ERR_200: NotEnoughETH: price {price}, sent {sent}")]
    NotEnoughEth { price: Decimal, sent: Decimal },

    /// The payer does not hold enough value for the transfer.
    #[error("VM_ERR_201: Insufficient balance for {account}: need {needed}, have {available}")]
    InsufficientBalance {
        account: Address,
        needed: Decimal,
        available: Decimal,
    },

    /// The recipient refuses value transfers.
    #[error("VM_ERR_202: Value rejected by {recipient}")]
    ValueRejected { recipient: Address },

    /// Value amounts must be non-negative.
    #[error("VM_ERR_203: Invalid amount: {0}")]
    InvalidAmount(Decimal),

    // =================================================================
    // Asset Registry Errors (3xx)
    // =================================================================
    /// The registry refused to move the item (wrong holder, missing
    /// authorization, bad recipient).
    #[error("VM_ERR_300: Transfer failed: {reason}")]
    TransferFailed { reason: String },

    /// The registry has no record of this item.
    #[error("VM_ERR_301: Item {item_id} not found in registry {registry}")]
    ItemNotFound { registry: Address, item_id: ItemId },

    /// No registry is deployed at this address.
    #[error("VM_ERR_302: Unknown registry: {0}")]
    UnknownRegistry(Address),

    /// An item with this id already exists.
    #[error("VM_ERR_303: Item {item_id} already exists in registry {registry}")]
    ItemAlreadyExists { registry: Address, item_id: ItemId },

    // =================================================================
    // Deposit Errors (4xx)
    // =================================================================
    /// A pushed item is not the one this machine sells.
    #[error("VM_ERR_400: NotSellingThisNFT: {registry} item {item_id}")]
    NotSellingThisNft { registry: Address, item_id: ItemId },

    // =================================================================
    // Host Errors (5xx)
    // =================================================================
    /// No sale machine is deployed at this address.
    #[error("VM_ERR_500: Unknown machine: {0}")]
    UnknownMachine(Address),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("VM_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("VM_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid sale parameters, missing fields, etc.).
    #[error("VM_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

impl VendingError {
    /// Whether this is a registry-level transfer failure.
    ///
    /// These are surfaced undifferentiated: the machine never maps them to
    /// a machine-specific error kind.
    #[must_use]
    pub fn is_transfer_failure(&self) -> bool {
        matches!(
            self,
            Self::TransferFailed { .. } | Self::ItemNotFound { .. } | Self::UnknownRegistry(_)
        )
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, VendingError>;

impl From<serde_json::Error> for VendingError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
