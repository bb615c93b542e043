//! Execution host for sale machines.
//!
//! The host owns the [`Ledger`] and every deployed [`SaleMachine`], and
//! runs each external call as one unit of work:
//!
//! ```text
//! execute(caller, machine, value, call)
//!   ├─ attach value: caller → machine
//!   ├─ machine.dispatch(...)          (registry + payment sub-calls)
//!   └─ Ok → commit │ Err → restore pre-call snapshot
//! ```
//!
//! Calls are strictly serialized: every entry point takes `&mut self`.
//! Push transfers into a machine run the machine's receiver hook inside the
//! same unit of work, so a rejected deposit leaves the item where it was.

use std::collections::HashMap;

use vending_ledger::Ledger;
use vending_types::{
    Address, Amount, AssetRegistry, CallContext, ItemId, PaymentChannel, PurchaseReceipt, Result,
    SaleConfig, VendingError, constants,
};

use crate::machine::{CallOutcome, MachineCall, SaleMachine};

/// Owns the ledger and the deployed machines.
#[derive(Debug, Default)]
pub struct Host {
    ledger: Ledger,
    machines: HashMap<Address, SaleMachine>,
    /// Per-deployer nonce for contract address derivation.
    nonces: HashMap<Address, u64>,
}

impl Host {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to registries, balances and the event log.
    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// The machine deployed at `address`.
    ///
    /// # Errors
    /// Returns `UnknownMachine` if none is deployed there.
    pub fn machine(&self, address: Address) -> Result<&SaleMachine> {
        self.machines
            .get(&address)
            .ok_or(VendingError::UnknownMachine(address))
    }

    // -----------------------------------------------------------------
    // Deployment
    // -----------------------------------------------------------------

    /// Deploy an empty asset registry. Returns its address.
    pub fn deploy_registry(&mut self, deployer: Address) -> Result<Address> {
        let address = self.next_address(deployer);
        self.ledger.deploy_registry(address)?;
        tracing::info!(registry = %address, deployer = %deployer, "Registry deployed");
        Ok(address)
    }

    /// Deploy a sale machine with `config`. Returns its address.
    ///
    /// # Errors
    /// Returns `Configuration` if the config is invalid.
    pub fn deploy(&mut self, deployer: Address, config: SaleConfig) -> Result<Address> {
        let address = self.next_address(deployer);
        let machine = SaleMachine::new(address, config)?;
        // Machines only take value through their payable operations.
        self.ledger.set_rejects_value(address, true);
        self.machines.insert(address, machine);
        tracing::info!(
            machine = %address,
            deployer = %deployer,
            seller = %config.seller,
            buyer = %config.buyer,
            price = %config.price,
            asset = %config.asset(),
            engine = constants::ENGINE_NAME,
            version = constants::VERSION,
            "Sale machine deployed"
        );
        Ok(address)
    }

    fn next_address(&mut self, deployer: Address) -> Address {
        let nonce = self.nonces.entry(deployer).or_insert(0);
        let address = Address::derive(deployer, *nonce);
        *nonce += 1;
        address
    }

    // -----------------------------------------------------------------
    // Participants: value and registry operations
    // -----------------------------------------------------------------

    /// Fund `account` with freshly minted value.
    pub fn fund(&mut self, account: Address, value: Amount) -> Result<()> {
        self.ledger.fund(account, value)
    }

    /// Mark an externally owned account as refusing value.
    pub fn set_rejects_value(&mut self, account: Address, rejects: bool) {
        self.ledger.set_rejects_value(account, rejects);
    }

    /// Mint `item_id` in `registry` to `to`.
    pub fn mint(&mut self, registry: Address, to: Address, item_id: ItemId) -> Result<()> {
        self.ledger.transact(|ledger| ledger.mint(registry, to, item_id))
    }

    /// `caller` authorizes `approved` to move `item_id`.
    pub fn approve(
        &mut self,
        caller: Address,
        registry: Address,
        approved: Address,
        item_id: ItemId,
    ) -> Result<()> {
        self.ledger
            .transact(|ledger| ledger.approve(caller, registry, approved, item_id))
    }

    /// `caller` grants or revokes blanket authorization for `operator`.
    pub fn set_approval_for_all(
        &mut self,
        caller: Address,
        registry: Address,
        operator: Address,
        approved: bool,
    ) -> Result<()> {
        self.ledger
            .transact(|ledger| ledger.set_approval_for_all(caller, registry, operator, approved))
    }

    /// Plain transfer. The recipient is not notified, even if it is a machine.
    pub fn transfer_from(
        &mut self,
        caller: Address,
        registry: Address,
        from: Address,
        to: Address,
        item_id: ItemId,
    ) -> Result<()> {
        self.ledger
            .transact(|ledger| ledger.transfer_from(caller, registry, from, to, item_id))
    }

    /// Push transfer. If `to` is a machine its receiver hook runs, and a
    /// rejection undoes the transfer.
    pub fn safe_transfer_from(
        &mut self,
        caller: Address,
        registry: Address,
        from: Address,
        to: Address,
        item_id: ItemId,
        data: &[u8],
    ) -> Result<()> {
        let machines = &self.machines;
        self.ledger.transact(|ledger| {
            ledger.transfer_from(caller, registry, from, to, item_id)?;
            if let Some(machine) = machines.get(&to) {
                let ctx = CallContext::without_value(registry, to);
                machine.on_asset_received(&ctx, caller, from, item_id, data)?;
            }
            Ok(())
        })
    }

    /// Send value with no operation. Machines refuse it.
    pub fn send_value(&mut self, from: Address, to: Address, value: Amount) -> Result<()> {
        if self.machines.contains_key(&to) {
            return self.execute(from, to, value, MachineCall::Receive).map(|_| ());
        }
        self.ledger
            .transact(|ledger| ledger.transfer_value(from, to, value))
    }

    // -----------------------------------------------------------------
    // Machine calls
    // -----------------------------------------------------------------

    /// Run one machine call as a unit of work.
    pub fn execute(
        &mut self,
        caller: Address,
        machine: Address,
        value: Amount,
        call: MachineCall,
    ) -> Result<CallOutcome> {
        let target = self
            .machines
            .get(&machine)
            .ok_or(VendingError::UnknownMachine(machine))?;
        let ctx = CallContext::new(caller, machine, value);
        self.ledger.transact(|ledger| {
            ledger.attach_value(caller, machine, value)?;
            target.dispatch(ledger, &ctx, call)
        })
    }

    /// `caller` buys the asset for themselves, attaching `value`.
    pub fn purchase(
        &mut self,
        caller: Address,
        machine: Address,
        value: Amount,
    ) -> Result<PurchaseReceipt> {
        self.execute(caller, machine, value, MachineCall::Purchase)
            .and_then(expect_receipt)
    }

    /// `caller` buys the asset for `recipient`, attaching `value`.
    pub fn purchase_for(
        &mut self,
        caller: Address,
        machine: Address,
        recipient: Address,
        value: Amount,
    ) -> Result<PurchaseReceipt> {
        self.execute(caller, machine, value, MachineCall::PurchaseFor { recipient })
            .and_then(expect_receipt)
    }

    /// `caller` withdraws `item_id` of `registry` from the machine to `recipient`.
    pub fn withdraw_nft(
        &mut self,
        caller: Address,
        machine: Address,
        registry: Address,
        item_id: ItemId,
        recipient: Address,
    ) -> Result<()> {
        let call = MachineCall::WithdrawNft {
            registry,
            item_id,
            recipient,
        };
        self.execute(caller, machine, Amount::ZERO, call).map(|_| ())
    }

    /// Value balance of `account`.
    #[must_use]
    pub fn balance(&self, account: Address) -> Amount {
        self.ledger.balance_of(account)
    }
}

fn expect_receipt(outcome: CallOutcome) -> Result<PurchaseReceipt> {
    match outcome {
        CallOutcome::Purchased(receipt) => Ok(receipt),
        CallOutcome::Withdrawn => Err(VendingError::Internal(
            "purchase produced a withdrawal outcome".into(),
        )),
    }
}
