//! Derived custody of the asset for sale.
//!
//! Custody is never stored. It is read from the registry at the start of
//! every operation, so a change the machine did not make (the seller moving
//! the asset elsewhere, say) is always observed.

use serde::{Deserialize, Serialize};

/// Who currently holds the asset, as reported by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Custody {
    /// Deposited into the machine. The machine transfers it out directly.
    Machine,
    /// Still in the seller's holding. The machine pulls it using the
    /// seller's standing authorization.
    Seller,
}

impl std::fmt::Display for Custody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Machine => write!(f, "MACHINE"),
            Self::Seller => write!(f, "SELLER"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custody_display() {
        assert_eq!(Custody::Machine.to_string(), "MACHINE");
        assert_eq!(Custody::Seller.to_string(), "SELLER");
    }
}
