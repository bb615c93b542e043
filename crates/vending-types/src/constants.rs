//! System-wide constants for the vending machine.

/// Decimal places of the native value unit (1 ether = 10^18 base units).
pub const ETHER_DECIMALS: u32 = 18;

/// Item id used by the reference deployment.
pub const DEFAULT_ITEM_ID: u64 = 48;

/// Price of the reference deployment, in ether.
pub const DEFAULT_PRICE_ETHER: u32 = 110;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Vending";
