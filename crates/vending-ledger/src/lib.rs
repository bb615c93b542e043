//! # vending-ledger
//!
//! In-memory collaborators for the sale machine: the asset registry and the
//! native value ledger it settles against.
//!
//! ## Architecture
//!
//! 1. **NftRegistry**: holders, per-item approvals, blanket operators
//! 2. **NativeLedger**: value balances, accounts that refuse plain value
//! 3. **Ledger**: both of the above plus the event log; implements
//!    [`AssetRegistry`](vending_types::AssetRegistry) and
//!    [`PaymentChannel`](vending_types::PaymentChannel)
//!
//! ## Unit of work
//!
//! ```text
//! Ledger::transact(|ledger| step_1?; step_2?; ...)
//!     Ok  → every effect and event kept
//!     Err → ledger restored to the snapshot taken before step_1
//! ```

pub mod ledger;
pub mod native;
pub mod nft_registry;

pub use ledger::Ledger;
pub use native::NativeLedger;
pub use nft_registry::NftRegistry;
