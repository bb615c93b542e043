//! Identifiers used throughout the vending machine.
//!
//! Accounts and contracts share one address space ([`Address`]). Assets are
//! addressed by the registry that tracks them plus an item id within it
//! ([`AssetRef`]). Receipts use UUIDv7 for time-ordered sorting.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::VendingError;

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A 20-byte account or contract address.
///
/// Rendered as `0x`-prefixed lowercase hex, and serialized the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The null address. Never a valid owner, seller, buyer or recipient.
    pub const ZERO: Self = Self([0u8; 20]);

    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Deterministic address for a human-readable label.
    ///
    /// The same label always maps to the same address, which keeps named
    /// accounts (`"seller"`, `"buyer"`, ...) stable across runs.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"vending:address:v1:");
        hasher.update(label.as_bytes());
        Self::from_digest(&hasher.finalize())
    }

    /// Address of the contract deployed by `deployer` with the given nonce.
    #[must_use]
    pub fn derive(deployer: Address, nonce: u64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"vending:contract:v1:");
        hasher.update(deployer.0);
        hasher.update(nonce.to_le_bytes());
        Self::from_digest(&hasher.finalize())
    }

    /// Random address, for tests.
    #[cfg(any(test, feature = "test-helpers"))]
    #[must_use]
    pub fn random() -> Self {
        Self(rand::random::<[u8; 20]>())
    }

    /// Abbreviated form for log lines (`0x1234abcd`).
    #[must_use]
    pub fn short(&self) -> String {
        format!("0x{}", hex::encode(&self.0[..4]))
    }

    fn from_digest(digest: &[u8]) -> Self {
        // Last 20 bytes of the 32-byte digest.
        let mut out = [0u8; 20];
        out.copy_from_slice(&digest[12..32]);
        Self(out)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = VendingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.len() != 40 {
            return Err(VendingError::Serialization(format!(
                "address must be 40 hex digits, got {}",
                digits.len()
            )));
        }
        let bytes = hex::decode(digits)
            .map_err(|e| VendingError::Serialization(format!("invalid address {s}: {e}")))?;
        let mut out = [0u8; 20];
        out.copy_from_slice(&bytes);
        Ok(Self(out))
    }
}

impl TryFrom<String> for Address {
    type Error = VendingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(addr: Address) -> Self {
        addr.to_string()
    }
}

// ---------------------------------------------------------------------------
// ItemId / AssetRef
// ---------------------------------------------------------------------------

/// Identifier of one item inside an asset registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ItemId(pub u64);

impl ItemId {
    /// The id immediately after this one.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A uniquely identified asset: the registry that tracks it plus its item id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetRef {
    /// Address of the registry holding the ownership record.
    pub registry: Address,
    /// Item id inside that registry.
    pub item_id: ItemId,
}

impl AssetRef {
    #[must_use]
    pub fn new(registry: Address, item_id: ItemId) -> Self {
        Self { registry, item_id }
    }

    /// Whether `(registry, item_id)` names this asset.
    #[must_use]
    pub fn matches(&self, registry: Address, item_id: ItemId) -> bool {
        self.registry == registry && self.item_id == item_id
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.registry.short(), self.item_id)
    }
}

// ---------------------------------------------------------------------------
// ReceiptId
// ---------------------------------------------------------------------------

/// Unique identifier for a purchase receipt. Uses UUIDv7 for time-ordered sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ReceiptId(pub Uuid);

impl ReceiptId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ReceiptId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rcpt:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
