//! Native value amounts.
//!
//! Amounts are whole base units held in a [`Decimal`]. Helpers convert
//! ether-denominated values (18 decimal places) into base units.

use rust_decimal::Decimal;

use crate::{VendingError, constants};

/// A quantity of native value, in base units.
pub type Amount = Decimal;

/// Whole ether to base units.
///
/// `u32::MAX` ether is about 4.3e27 base units, inside `Decimal`'s range.
#[must_use]
pub fn ether(whole: u32) -> Amount {
    Decimal::from(whole) * base_units_per_ether()
}

fn base_units_per_ether() -> Decimal {
    Decimal::from(10u64.pow(constants::ETHER_DECIMALS))
}

/// Parse an ether-denominated string (`"110"`, `"0.5"`) into base units.
///
/// # Errors
/// Returns `Serialization` for non-numeric input and `InvalidAmount` for
/// negative values or values finer than one base unit.
pub fn parse_ether(text: &str) -> Result<Amount, VendingError> {
    let value: Decimal = text
        .trim()
        .parse()
        .map_err(|e| VendingError::Serialization(format!("invalid ether amount {text:?}: {e}")))?;
    if value.is_sign_negative() {
        return Err(VendingError::InvalidAmount(value));
    }
    let base = value
        .checked_mul(base_units_per_ether())
        .ok_or(VendingError::InvalidAmount(value))?;
    if !base.fract().is_zero() {
        return Err(VendingError::InvalidAmount(value));
    }
    Ok(base.normalize())
}

/// Reject negative amounts.
///
/// # Errors
/// Returns `InvalidAmount` when `amount < 0`.
pub fn ensure_non_negative(amount: Amount) -> Result<Amount, VendingError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        Err(VendingError::InvalidAmount(amount))
    } else {
        Ok(amount)
    }
}

/// Reject amounts finer than one base unit.
///
/// # Errors
/// Returns `InvalidAmount` when `amount` has a fractional part.
pub fn ensure_whole_units(amount: Amount) -> Result<Amount, VendingError> {
    if amount.fract().is_zero() {
        Ok(amount)
    } else {
        Err(VendingError::InvalidAmount(amount))
    }
}

/// A value that can move through the ledger: non-negative whole base units.
///
/// # Errors
/// Returns `InvalidAmount` for negative or fractional amounts.
pub fn ensure_transferable(amount: Amount) -> Result<Amount, VendingError> {
    ensure_whole_units(ensure_non_negative(amount)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ether_scales_by_eighteen_places() {
        assert_eq!(ether(1), Decimal::from(1_000_000_000_000_000_000u64));
        assert_eq!(ether(110), Decimal::from(110u64) * ether(1));
    }

    #[test]
    fn parse_ether_accepts_fractions() {
        assert_eq!(parse_ether("110").unwrap(), ether(110));
        assert_eq!(
            parse_ether("0.5").unwrap(),
            Decimal::from(500_000_000_000_000_000u64)
        );
    }

    #[test]
    fn parse_ether_rejects_bad_input() {
        assert!(matches!(
            parse_ether("abc").unwrap_err(),
            VendingError::Serialization(_)
        ));
        assert!(matches!(
            parse_ether("-1").unwrap_err(),
            VendingError::InvalidAmount(_)
        ));
        assert!(matches!(
            parse_ether("0.0000000000000000001").unwrap_err(),
            VendingError::InvalidAmount(_)
        ));
    }

    #[test]
    fn negative_amounts_rejected() {
        assert!(ensure_non_negative(Decimal::ZERO).is_ok());
        assert!(ensure_non_negative(Decimal::ONE).is_ok());
        assert!(ensure_non_negative(Decimal::NEGATIVE_ONE).is_err());
    }

    #[test]
    fn fractional_base_units_rejected() {
        assert!(ensure_whole_units(Decimal::new(1100, 1)).is_ok());
        assert!(matches!(
            ensure_whole_units(Decimal::new(1105, 1)).unwrap_err(),
            VendingError::InvalidAmount(_)
        ));
        assert!(ensure_transferable(Decimal::new(-5, 1)).is_err());
        assert!(ensure_transferable(ether(3)).is_ok());
    }

    #[test]
    fn largest_ether_amount_fits() {
        let max = ether(u32::MAX);
        assert_eq!(max, Decimal::from(u32::MAX) * ether(1));
        assert!(max < Decimal::MAX);
    }
}
