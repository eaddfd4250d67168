//! Field validators used by the stage input structs
//!
//! Each function has the shape expected by `#[validate(custom = "...")]`.

use std::borrow::Cow;

use rust_decimal::Decimal;
use validator::ValidationError;

use crate::types::StockDetail;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Required text field: must contain something other than whitespace
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("required", "This field is required"));
    }
    Ok(())
}

/// Quantity that must be strictly positive (e.g. plan target quantity)
pub fn validate_positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(error("positive", "Quantity must be greater than zero"));
    }
    Ok(())
}

/// Quantity that may be zero but never negative (fuel, costs)
pub fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(error("non_negative", "Quantity cannot be negative"));
    }
    Ok(())
}

/// Percentage in 0-100 (raw material share, LOI)
pub fn validate_percentage(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO || *value > Decimal::from(100) {
        return Err(error("percentage", "Percentage must be between 0 and 100"));
    }
    Ok(())
}

/// Stock triple with no negative component
pub fn validate_stock_detail(stock: &StockDetail) -> Result<(), ValidationError> {
    let components = [stock.open_stock, stock.charged_qty, stock.close_stock];
    if components.iter().any(|value| *value < Decimal::ZERO) {
        return Err(error(
            "non_negative_stock",
            "Open stock, charged quantity and close stock cannot be negative",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_rejected() {
        assert!(validate_not_blank("  ").is_err());
        assert!(validate_not_blank("Clinker").is_ok());
    }

    #[test]
    fn percentage_bounds_are_inclusive() {
        assert!(validate_percentage(&Decimal::ZERO).is_ok());
        assert!(validate_percentage(&Decimal::from(100)).is_ok());
        assert!(validate_percentage(&Decimal::new(1001, 1)).is_err());
        assert!(validate_percentage(&Decimal::from(-1)).is_err());
    }

    #[test]
    fn target_quantity_must_be_positive() {
        assert!(validate_positive(&Decimal::ZERO).is_err());
        assert!(validate_positive(&Decimal::new(1, 2)).is_ok());
    }

    #[test]
    fn stock_detail_rejects_negative_component() {
        let stock = StockDetail::new(Decimal::from(5), Decimal::from(-1), Decimal::ZERO);
        let err = validate_stock_detail(&stock).unwrap_err();
        assert_eq!(err.code, "non_negative_stock");
        assert!(validate_stock_detail(&StockDetail::default()).is_ok());
    }
}
