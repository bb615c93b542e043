//! Purchase receipts.
//!
//! Every successful purchase returns a [`PurchaseReceipt`] describing what
//! moved where. The receipt carries a SHA-256 digest of its canonical fields
//! so it can be checked independently of the ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{Address, Amount, AssetRef, Custody, ReceiptId};

/// Proof of one completed purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    /// Unique receipt id.
    pub id: ReceiptId,
    /// The machine that settled the sale.
    pub machine: Address,
    /// The asset that was delivered.
    pub asset: AssetRef,
    /// Who paid (always the configured buyer).
    pub payer: Address,
    /// Who received the asset.
    pub recipient: Address,
    /// Where the asset was taken from.
    pub source: Custody,
    /// Value forwarded to the seller. Equals the attached value, not the price.
    pub amount: Amount,
    /// SHA-256 over the canonical fields, hex-encoded.
    pub digest: String,
    /// When the purchase settled.
    pub issued_at: DateTime<Utc>,
}

impl PurchaseReceipt {
    #[must_use]
    pub fn new(
        machine: Address,
        asset: AssetRef,
        payer: Address,
        recipient: Address,
        source: Custody,
        amount: Amount,
    ) -> Self {
        let digest = Self::compute_digest(machine, asset, payer, recipient, source, amount);
        Self {
            id: ReceiptId::new(),
            machine,
            asset,
            payer,
            recipient,
            source,
            amount,
            digest,
            issued_at: Utc::now(),
        }
    }

    /// Whether the stored digest matches the receipt's fields.
    #[must_use]
    pub fn verify(&self) -> bool {
        self.digest
            == Self::compute_digest(
                self.machine,
                self.asset,
                self.payer,
                self.recipient,
                self.source,
                self.amount,
            )
    }

    fn compute_digest(
        machine: Address,
        asset: AssetRef,
        payer: Address,
        recipient: Address,
        source: Custody,
        amount: Amount,
    ) -> String {
        let mut hasher = Sha256::new();
        hasher.update(b"vending:receipt:v1:");
        hasher.update(machine.0);
        hasher.update(asset.registry.0);
        hasher.update(asset.item_id.0.to_le_bytes());
        hasher.update(payer.0);
        hasher.update(recipient.0);
        hasher.update(source.to_string().as_bytes());
        hasher.update(amount.normalize().to_string().as_bytes());
        hex::encode(hasher.finalize())
    }
}
