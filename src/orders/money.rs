//! Money calculation utilities using rust_decimal for precision
//!
//! This module provides precise decimal arithmetic for monetary calculations.
//! All calculations are done using `Decimal` internally, then converted to
//! `f64` for storage/serialization.

use rust_decimal::prelude::*;

use crate::utils::AppError;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed price per item
const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per item
const MAX_QUANTITY: i32 = 9999;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Validate a cart line before pricing
///
/// 价格来自目录快照而不是请求体，但仍然校验有限性和上限，
/// 避免坏数据进入订单历史。
pub fn validate_order_item(unit_price: f64, quantity: i32) -> Result<(), AppError> {
    if !unit_price.is_finite() {
        return Err(AppError::validation(format!(
            "unit price must be a finite number, got {}",
            unit_price
        )));
    }
    if unit_price < 0.0 {
        return Err(AppError::validation(format!(
            "unit price must be non-negative, got {}",
            unit_price
        )));
    }
    if unit_price > MAX_PRICE {
        return Err(AppError::validation(format!(
            "unit price exceeds maximum allowed ({}), got {}",
            MAX_PRICE, unit_price
        )));
    }

    if quantity <= 0 {
        return Err(AppError::validation(format!(
            "quantity must be positive, got {}",
            quantity
        )));
    }
    if quantity > MAX_QUANTITY {
        return Err(AppError::validation(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, quantity
        )));
    }

    Ok(())
}

/// Calculate a line total with precise decimal arithmetic
///
/// Formula: unit_price × quantity, rounded to cents
pub fn line_total(unit_price: f64, quantity: i32) -> Decimal {
    let unit_price = to_decimal(unit_price);
    let quantity = Decimal::from(quantity);

    (unit_price * quantity)
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Total price of an order: sum of line totals, rounded to cents
pub fn order_total<I>(line_totals: I) -> f64
where
    I: IntoIterator<Item = Decimal>,
{
    let total: Decimal = line_totals.into_iter().sum();
    to_f64(total)
}
