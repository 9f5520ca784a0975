//! Order processing tests
//!
//! Tests for order amounts and document numbering:
//! - Line amounts and order totals from snapshots
//! - Total = subtotal + tax, always
//! - Document numbers are typed, date-scoped and zero-padded

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::models::order::{document_number, line_amounts, OrderTotals, OrderType};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Line subtotal is quantity times unit price
    #[test]
    fn test_line_subtotal() {
        let amounts = line_amounts(3, dec("12.50"), dec("0"));
        assert_eq!(amounts.subtotal, dec("37.50"));
        assert_eq!(amounts.tax, dec("0.0000"));
    }

    /// Tax is a percentage of the line subtotal
    #[test]
    fn test_line_tax_is_percent_of_subtotal() {
        let amounts = line_amounts(2, dec("50.00"), dec("21"));
        assert_eq!(amounts.subtotal, dec("100.00"));
        assert_eq!(amounts.tax, dec("21.0000"));
    }

    /// Totals accumulate over mixed-rate lines
    #[test]
    fn test_totals_over_mixed_rates() {
        let totals = OrderTotals::compute([
            (2, dec("10.00"), dec("10")),
            (5, dec("4.00"), dec("0")),
            (1, dec("100.00"), dec("21")),
        ]);
        assert_eq!(totals.subtotal, dec("140.00"));
        assert_eq!(totals.tax_amount, dec("23.0000"));
        assert_eq!(totals.total, dec("163.0000"));
    }

    /// An empty order totals to zero
    #[test]
    fn test_empty_totals() {
        let totals = OrderTotals::compute([]);
        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.tax_amount, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::ZERO);
    }

    /// Sales and purchases use distinct document prefixes
    #[test]
    fn test_document_prefixes() {
        assert_eq!(OrderType::Sale.document_prefix(), "S");
        assert_eq!(OrderType::Purchase.document_prefix(), "P");
    }

    /// Document numbers embed the date and a zero-padded sequence
    #[test]
    fn test_document_number_format() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 27).unwrap();
        assert_eq!(document_number(OrderType::Sale, date, 1), "S-20260827-0001");
        assert_eq!(
            document_number(OrderType::Purchase, date, 512),
            "P-20260827-0512"
        );
    }

    /// Sequences above the pad width keep growing without truncation
    #[test]
    fn test_document_number_wide_sequence() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 27).unwrap();
        assert_eq!(
            document_number(OrderType::Sale, date, 12345),
            "S-20260827-12345"
        );
    }

    /// Order type strings round-trip
    #[test]
    fn test_order_type_round_trip() {
        for order_type in [OrderType::Sale, OrderType::Purchase] {
            assert_eq!(OrderType::parse(order_type.as_str()), Some(order_type));
        }
        assert_eq!(OrderType::parse("refund"), None);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn price_strategy() -> impl Strategy<Value = Decimal> {
        (1u32..100_000).prop_map(|cents| Decimal::new(cents as i64, 2))
    }

    fn rate_strategy() -> impl Strategy<Value = Decimal> {
        (0u32..10_000).prop_map(|hundredths| Decimal::new(hundredths as i64, 2))
    }

    fn line_strategy() -> impl Strategy<Value = (i64, Decimal, Decimal)> {
        (1i64..1_000, price_strategy(), rate_strategy())
    }

    proptest! {
        /// Total always equals subtotal plus tax
        #[test]
        fn prop_total_is_subtotal_plus_tax(
            lines in prop::collection::vec(line_strategy(), 0..10)
        ) {
            let totals = OrderTotals::compute(lines);
            prop_assert_eq!(totals.total, totals.subtotal + totals.tax_amount);
        }

        /// Order totals equal the sum of the individual line amounts
        #[test]
        fn prop_totals_sum_lines(
            lines in prop::collection::vec(line_strategy(), 1..10)
        ) {
            let totals = OrderTotals::compute(lines.iter().copied());

            let mut subtotal = Decimal::ZERO;
            let mut tax = Decimal::ZERO;
            for (quantity, unit_price, tax_rate) in &lines {
                let amounts = line_amounts(*quantity, *unit_price, *tax_rate);
                subtotal += amounts.subtotal;
                tax += amounts.tax;
            }

            prop_assert_eq!(totals.subtotal, subtotal);
            prop_assert_eq!(totals.tax_amount, tax);
        }

        /// A zero tax rate contributes no tax
        #[test]
        fn prop_zero_rate_no_tax(
            quantity in 1i64..1_000,
            unit_price in price_strategy()
        ) {
            let amounts = line_amounts(quantity, unit_price, Decimal::ZERO);
            prop_assert_eq!(amounts.tax, Decimal::ZERO);
        }

        /// Amounts scale linearly with quantity
        #[test]
        fn prop_amounts_scale_with_quantity(
            quantity in 1i64..500,
            unit_price in price_strategy(),
            tax_rate in rate_strategy()
        ) {
            let single = line_amounts(1, unit_price, tax_rate);
            let many = line_amounts(quantity, unit_price, tax_rate);
            let factor = Decimal::from(quantity);
            prop_assert_eq!(many.subtotal, single.subtotal * factor);
            prop_assert_eq!(many.tax, single.tax * factor);
        }

        /// Document numbers are unique across sequences within a day
        /// and across types for the same sequence
        #[test]
        fn prop_document_numbers_distinct(
            seq_a in 1i64..10_000,
            seq_b in 1i64..10_000
        ) {
            let date = NaiveDate::from_ymd_opt(2026, 8, 27).unwrap();
            let sale_a = document_number(OrderType::Sale, date, seq_a);
            let sale_b = document_number(OrderType::Sale, date, seq_b);
            let purchase_a = document_number(OrderType::Purchase, date, seq_a);

            if seq_a != seq_b {
                prop_assert_ne!(&sale_a, &sale_b);
            } else {
                prop_assert_eq!(&sale_a, &sale_b);
            }
            prop_assert_ne!(&sale_a, &purchase_a);
        }

        /// Document numbers parse back into their parts
        #[test]
        fn prop_document_number_structure(sequence in 1i64..9_999) {
            let date = NaiveDate::from_ymd_opt(2026, 8, 27).unwrap();
            let number = document_number(OrderType::Sale, date, sequence);
            let parts: Vec<&str> = number.split('-').collect();

            prop_assert_eq!(parts.len(), 3);
            prop_assert_eq!(parts[0], "S");
            prop_assert_eq!(parts[1], "20260827");
            prop_assert_eq!(parts[2].parse::<i64>().unwrap(), sequence);
            prop_assert_eq!(parts[2].len(), 4);
        }
    }
}
