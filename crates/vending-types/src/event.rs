//! Events emitted by the ledger.
//!
//! Events are appended to the ledger's log as effects happen and are
//! discarded together with the effects when a call fails.

use serde::{Deserialize, Serialize};

use crate::{Address, Amount, ItemId};

/// A ledger effect observable after a call commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// An item changed hands. `from` is `ZERO` for a mint.
    Transfer {
        registry: Address,
        from: Address,
        to: Address,
        item_id: ItemId,
    },
    /// A single-item transfer authorization was granted (or cleared, with `ZERO`).
    Approval {
        registry: Address,
        owner: Address,
        approved: Address,
        item_id: ItemId,
    },
    /// A blanket operator authorization was granted or revoked.
    ApprovalForAll {
        registry: Address,
        owner: Address,
        operator: Address,
        approved: bool,
    },
    /// Native value moved between accounts.
    ValueTransfer {
        from: Address,
        to: Address,
        amount: Amount,
    },
}

impl Event {
    /// Whether this is a `Transfer` of `item_id` from `from` to `to` in `registry`.
    #[must_use]
    pub fn is_transfer(&self, registry: Address, from: Address, to: Address, item_id: ItemId) -> bool {
        *self
            == Self::Transfer {
                registry,
                from,
                to,
                item_id,
            }
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transfer { from, to, item_id, .. } => {
                write!(f, "TRANSFER {item_id} {} -> {}", from.short(), to.short())
            }
            Self::Approval { approved, item_id, .. } => {
                write!(f, "APPROVAL {item_id} -> {}", approved.short())
            }
            Self::ApprovalForAll { operator, approved, .. } => {
                write!(f, "APPROVAL_FOR_ALL {} = {approved}", operator.short())
            }
            Self::ValueTransfer { from, to, amount } => {
                write!(f, "VALUE {amount} {} -> {}", from.short(), to.short())
            }
        }
    }
}
