//! Sales and purchase order models
//!
//! An order is a header plus lines. Unit price and tax rate are snapshots
//! taken at order time and never recomputed from the catalog afterwards.

use chrono::NaiveDate;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of order: sale to a client or purchase from a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Sale,
    Purchase,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Sale => "sale",
            OrderType::Purchase => "purchase",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sale" => Some(OrderType::Sale),
            "purchase" => Some(OrderType::Purchase),
            _ => None,
        }
    }

    /// Prefix used in document numbers
    pub fn document_prefix(&self) -> &'static str {
        match self {
            OrderType::Sale => "S",
            OrderType::Purchase => "P",
        }
    }
}

/// Order header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub order_type: OrderType,
    pub document_number: String,
    /// Client id for sales, provider id for purchases
    pub counterparty_id: Uuid,
    pub user_id: Uuid,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Order line with price and tax-rate snapshots
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i64,
    pub unit_price: Decimal,
    /// Tax rate in percent, copied from the product's tax at order time
    pub tax_rate: Decimal,
    pub line_subtotal: Decimal,
}

/// Amounts for a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineAmounts {
    pub subtotal: Decimal,
    pub tax: Decimal,
}

/// Compute subtotal and tax for one line from its snapshots.
pub fn line_amounts(quantity: i64, unit_price: Decimal, tax_rate: Decimal) -> LineAmounts {
    let subtotal = unit_price * Decimal::from(quantity);
    let tax = subtotal * tax_rate / Decimal::from(100);
    LineAmounts { subtotal, tax }
}

/// Summed amounts for an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
}

impl OrderTotals {
    /// Accumulate totals over (quantity, unit price, tax rate) triples.
    pub fn compute<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = (i64, Decimal, Decimal)>,
    {
        let mut subtotal = Decimal::ZERO;
        let mut tax_amount = Decimal::ZERO;
        for (quantity, unit_price, tax_rate) in lines {
            let amounts = line_amounts(quantity, unit_price, tax_rate);
            subtotal += amounts.subtotal;
            tax_amount += amounts.tax;
        }
        Self {
            subtotal,
            tax_amount,
            total: subtotal + tax_amount,
        }
    }
}

/// Format a date-scoped sequential document number, e.g. `S-20260115-0003`.
///
/// Uniqueness is per calendar day and order type; gaps are acceptable,
/// collisions within a day are not.
pub fn document_number(order_type: OrderType, date: NaiveDate, sequence: i64) -> String {
    format!(
        "{}-{}-{:04}",
        order_type.document_prefix(),
        date.format("%Y%m%d"),
        sequence
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn line_amounts_apply_percent_tax() {
        let amounts = line_amounts(4, dec("2.50"), dec("16"));
        assert_eq!(amounts.subtotal, dec("10.00"));
        assert_eq!(amounts.tax, dec("1.60"));
    }

    #[test]
    fn totals_sum_over_lines() {
        let totals = OrderTotals::compute([
            (2, dec("10.00"), dec("16")),
            (1, dec("5.00"), dec("0")),
        ]);
        assert_eq!(totals.subtotal, dec("25.00"));
        assert_eq!(totals.tax_amount, dec("3.20"));
        assert_eq!(totals.total, dec("28.20"));
    }

    #[test]
    fn document_number_is_zero_padded_and_typed() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        assert_eq!(document_number(OrderType::Sale, date, 3), "S-20260115-0003");
        assert_eq!(
            document_number(OrderType::Purchase, date, 41),
            "P-20260115-0041"
        );
    }
}
