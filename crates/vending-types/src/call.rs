//! Call context handed to the machine for every operation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, Amount};

/// Who is calling, what they attached, and which contract is executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    /// The immediate caller. For a receiver callback this is the registry.
    pub caller: Address,
    /// Value attached to the call. Already credited to `this` when the
    /// machine runs.
    pub value: Amount,
    /// Address of the executing contract.
    pub this: Address,
}

impl CallContext {
    #[must_use]
    pub fn new(caller: Address, this: Address, value: Amount) -> Self {
        Self {
            caller,
            value,
            this,
        }
    }

    /// A call with no value attached.
    #[must_use]
    pub fn without_value(caller: Address, this: Address) -> Self {
        Self::new(caller, this, Decimal::ZERO)
    }

    #[must_use]
    pub fn carries_value(&self) -> bool {
        !self.value.is_zero()
    }
}
