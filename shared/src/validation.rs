//! Validation utilities for the Business Management Platform

use rust_decimal::Decimal;

/// Validate that an order/movement quantity is positive
pub fn validate_quantity(quantity: i64) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be positive");
    }
    Ok(())
}

/// Validate a price or amount is non-negative
pub fn validate_amount(amount: Decimal) -> Result<(), &'static str> {
    if amount < Decimal::ZERO {
        return Err("Amount cannot be negative");
    }
    Ok(())
}

/// Validate a tax rate is a percentage
pub fn validate_tax_rate(rate: Decimal) -> Result<(), &'static str> {
    if rate < Decimal::ZERO || rate > Decimal::from(100) {
        return Err("Tax rate must be between 0 and 100");
    }
    Ok(())
}

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate a product code: non-empty, no surrounding whitespace
pub fn validate_product_code(code: &str) -> Result<(), &'static str> {
    if code.trim().is_empty() {
        return Err("Product code cannot be empty");
    }
    if code.trim() != code {
        return Err("Product code cannot have surrounding whitespace");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_quantities() {
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-4).is_err());
        assert!(validate_quantity(1).is_ok());
    }

    #[test]
    fn tax_rate_bounds() {
        assert!(validate_tax_rate(Decimal::from(16)).is_ok());
        assert!(validate_tax_rate(Decimal::from(101)).is_err());
        assert!(validate_tax_rate(Decimal::from(-1)).is_err());
    }
}
