//! # vending-machine
//!
//! **Sale machine**: a neutral custodian that sells one asset to one buyer
//! for a fixed minimum price.
//!
//! ## Architecture
//!
//! The [`SaleMachine`] holds only its address and an immutable
//! [`SaleConfig`](vending_types::SaleConfig). It:
//! 1. Checks the caller (buyer for purchases, seller for withdrawals)
//! 2. Checks the attached value against the price
//! 3. Reads custody from the registry (machine-held or seller-held)
//! 4. Moves the asset to the recipient
//! 5. Forwards the entire attached value to the seller
//!
//! The [`Host`] runs every call as one unit of work over the
//! [`Ledger`](vending_ledger::Ledger), so a failure at any step leaves no
//! effect behind.
//!
//! ## Operations
//!
//! - `purchase` / `purchase_for`: settle the sale (payable)
//! - `on_asset_received`: accept a push deposit of the configured asset only
//! - `withdraw_nft`: seller-only escape hatch for machine-held items
//! - `receive`: bare value, always refused

pub mod host;
pub mod machine;

pub use host::Host;
pub use machine::{CallOutcome, MachineCall, SaleMachine};
