//! Money calculation in integer cents
//!
//! Arithmetic runs in `Decimal`; results are rounded to whole cents with
//! half-away-from-zero. Rounding happens once per unit price and once for
//! the tax on the aggregate subtotal, never per line.

use rust_decimal::prelude::*;
use thiserror::Error;

use shared::error::{AppError, ErrorCode};
pub use shared::models::{MAX_PRICE_CENTS, MAX_QUANTITY};

/// 10000 basis points = 100%
pub const BASIS_POINTS: i64 = 10_000;
/// Flat sales tax (IVA 16%)
pub const TAX_RATE_BASIS_POINTS: i64 = 1_600;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("discount must be between 0 and 10000 basis points, got {0}")]
    InvalidDiscount(i32),

    #[error("price must be between 0 and {max} cents, got {0}", max = MAX_PRICE_CENTS)]
    InvalidPrice(i64),

    #[error("quantity must be between 1 and {max}, got {0}", max = MAX_QUANTITY)]
    InvalidQuantity(i32),

    #[error("amount out of range")]
    Overflow,
}

impl From<PricingError> for AppError {
    fn from(e: PricingError) -> Self {
        let code = match e {
            PricingError::InvalidDiscount(_) => ErrorCode::RoleInvalidDiscount,
            PricingError::InvalidPrice(_) => ErrorCode::ProductInvalidPrice,
            PricingError::InvalidQuantity(_) => ErrorCode::ValueOutOfRange,
            PricingError::Overflow => ErrorCode::ValueOutOfRange,
        };
        AppError::with_message(code, e.to_string())
    }
}

/// Round a decimal amount to whole cents
#[inline]
fn to_cents(value: Decimal) -> Result<i64, PricingError> {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::Overflow)
}

pub fn validate_discount(discount_bp: i32) -> Result<(), PricingError> {
    if !(0..=BASIS_POINTS as i32).contains(&discount_bp) {
        return Err(PricingError::InvalidDiscount(discount_bp));
    }
    Ok(())
}

pub fn validate_price(price_cents: i64) -> Result<(), PricingError> {
    if !(0..=MAX_PRICE_CENTS).contains(&price_cents) {
        return Err(PricingError::InvalidPrice(price_cents));
    }
    Ok(())
}

pub fn validate_quantity(quantity: i32) -> Result<(), PricingError> {
    if !(1..=MAX_QUANTITY).contains(&quantity) {
        return Err(PricingError::InvalidQuantity(quantity));
    }
    Ok(())
}

/// `round(base * (1 - discount / 10000))`
pub fn effective_price(base_cents: i64, discount_bp: i32) -> Result<i64, PricingError> {
    validate_price(base_cents)?;
    validate_discount(discount_bp)?;

    let base = Decimal::from(base_cents);
    let remaining = Decimal::from(BASIS_POINTS - i64::from(discount_bp));
    to_cents(base * remaining / Decimal::from(BASIS_POINTS))
}

/// Exact `unit * quantity`
pub fn line_total(unit_cents: i64, quantity: i32) -> Result<i64, PricingError> {
    validate_quantity(quantity)?;
    unit_cents
        .checked_mul(i64::from(quantity))
        .ok_or(PricingError::Overflow)
}

/// Tax on the aggregate subtotal, rounded once
pub fn tax_for(subtotal_cents: i64) -> Result<i64, PricingError> {
    let subtotal = Decimal::from(subtotal_cents);
    to_cents(subtotal * Decimal::from(TAX_RATE_BASIS_POINTS) / Decimal::from(BASIS_POINTS))
}

/// Cents to currency units for external APIs (`12345` → `123.45`)
pub fn cents_to_units(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_price_bounds() {
        assert_eq!(effective_price(10_000, 0), Ok(10_000));
        assert_eq!(effective_price(10_000, 10_000), Ok(0));
        assert_eq!(effective_price(0, 2_500), Ok(0));
    }

    #[test]
    fn test_effective_price_quarter_off() {
        assert_eq!(effective_price(10_000, 2_500), Ok(7_500));
    }

    #[test]
    fn test_effective_price_rounds_half_away_from_zero() {
        // 999 * 0.85 = 849.15
        assert_eq!(effective_price(999, 1_500), Ok(849));
        // 5 * 0.5 = 2.5
        assert_eq!(effective_price(5, 5_000), Ok(3));
        // 3 * 0.5 = 1.5
        assert_eq!(effective_price(3, 5_000), Ok(2));
        // 333 * (1 - 0.3333) = 222.0111
        assert_eq!(effective_price(333, 3_333), Ok(222));
    }

    #[test]
    fn test_effective_price_rejects_out_of_range() {
        assert_eq!(
            effective_price(10_000, 10_001),
            Err(PricingError::InvalidDiscount(10_001))
        );
        assert_eq!(
            effective_price(10_000, -1),
            Err(PricingError::InvalidDiscount(-1))
        );
        assert_eq!(effective_price(-5, 0), Err(PricingError::InvalidPrice(-5)));
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line_total(7_500, 2), Ok(15_000));
        assert_eq!(line_total(7_500, 0), Err(PricingError::InvalidQuantity(0)));
    }

    #[test]
    fn test_tax() {
        assert_eq!(tax_for(15_000), Ok(2_400));
        assert_eq!(tax_for(0), Ok(0));
        // 16% of 3 = 0.48
        assert_eq!(tax_for(3), Ok(0));
        // 16% of 50 = 8
        assert_eq!(tax_for(50), Ok(8));
        // 16% of 1234 = 197.44
        assert_eq!(tax_for(1_234), Ok(197));
    }

    #[test]
    fn test_cents_to_units() {
        assert_eq!(cents_to_units(17_400).to_string(), "174.00");
        assert_eq!(cents_to_units(5).to_string(), "0.05");
    }

    #[test]
    fn test_error_codes() {
        let err: AppError = PricingError::InvalidDiscount(20_000).into();
        assert_eq!(err.code, ErrorCode::RoleInvalidDiscount);
        let err: AppError = PricingError::InvalidPrice(-1).into();
        assert_eq!(err.code, ErrorCode::ProductInvalidPrice);
    }
}
