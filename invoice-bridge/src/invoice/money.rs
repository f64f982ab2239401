//! VAT arithmetic using rust_decimal for precision
//!
//! Shop prices include 21% VAT. The provider wants tax-exclusive unit prices,
//! so every amount is divided by 1.21 in `Decimal` and rounded once, at the
//! per-line unit price.

use crate::{BridgeError, BridgeResult};
use rust_decimal::prelude::*;

/// Rounding precision for unit prices (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// 1.21
const VAT_FACTOR: Decimal = Decimal::from_parts(121, 0, 0, false, 2);

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
pub fn require_finite(value: f64, field_name: &str) -> BridgeResult<()> {
    if !value.is_finite() {
        return Err(BridgeError::Validation(format!(
            "{} must be a finite number, got {}",
            field_name, value
        )));
    }
    Ok(())
}

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Strip 21% VAT from a tax-inclusive amount (unrounded)
#[inline]
pub fn exclude_vat(total_with_tax: Decimal) -> Decimal {
    total_with_tax / VAT_FACTOR
}

/// Tax-exclusive unit price: `round(total / 1.21 / quantity, 2)`, 0 for quantity ≤ 0
pub fn unit_price_without_vat(total_with_tax: f64, quantity: i32) -> f64 {
    if quantity <= 0 {
        return 0.0;
    }
    to_f64(exclude_vat(to_decimal(total_with_tax)) / Decimal::from(quantity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vat_factor() {
        assert_eq!(VAT_FACTOR.to_string(), "1.21");
    }

    #[test]
    fn test_exact_division() {
        assert_eq!(unit_price_without_vat(121.0, 1), 100.0);
        assert_eq!(unit_price_without_vat(242.0, 2), 100.0);
        assert_eq!(unit_price_without_vat(8000.0, 4), 1652.89);
    }

    #[test]
    fn test_rounds_at_unit_price() {
        // 100 / 1.21 = 82.6446..., / 3 = 27.5482...
        assert_eq!(unit_price_without_vat(100.0, 3), 27.55);
        // 50 / 1.21 = 41.3223...
        assert_eq!(unit_price_without_vat(50.0, 1), 41.32);
        // 99.99 / 1.21 = 82.636...
        assert_eq!(unit_price_without_vat(99.99, 1), 82.64);
    }

    #[test]
    fn test_zero_quantity_yields_zero() {
        assert_eq!(unit_price_without_vat(121.0, 0), 0.0);
        assert_eq!(unit_price_without_vat(121.0, -2), 0.0);
    }

    #[test]
    fn test_require_finite() {
        assert!(require_finite(1.5, "total").is_ok());
        assert!(matches!(
            require_finite(f64::NAN, "total"),
            Err(BridgeError::Validation(_))
        ));
        assert!(require_finite(f64::INFINITY, "total").is_err());
    }
}
