//! # vending-types
//!
//! Shared types, errors, and configuration for the **Vending** sale machine.
//!
//! This crate is the leaf dependency of the workspace. It defines:
//!
//! - **Identifiers**: [`Address`], [`ItemId`], [`AssetRef`], [`ReceiptId`]
//! - **Value**: [`Amount`] and the [`amount`] helpers
//! - **Sale model**: [`SaleConfig`], [`Custody`], [`CallContext`]
//! - **Audit**: [`Event`], [`PurchaseReceipt`]
//! - **Collaborators**: [`AssetRegistry`], [`PaymentChannel`]
//! - **Errors**: [`VendingError`] with `VM_ERR_` prefix codes
//! - **Constants**: system-wide defaults

pub mod amount;
pub mod call;
pub mod config;
pub mod constants;
pub mod custody;
pub mod error;
pub mod event;
pub mod ids;
pub mod interfaces;
pub mod receipt;

pub use amount::Amount;
pub use call::*;
pub use config::*;
pub use custody::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use interfaces::*;
pub use receipt::*;

// Constants are accessed via `vending_types::constants::FOO`.
