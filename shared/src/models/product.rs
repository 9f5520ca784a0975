//! Product catalog models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A catalog product. Identity (id, code) is immutable; pricing and the
/// minimum-stock threshold are mutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub category: Option<String>,
    pub purchase_price: Decimal,
    pub sale_price: Decimal,
    /// Quantity at or below which the product is considered low on stock
    pub min_stock: i64,
    pub tax_id: Uuid,
    pub created_at: DateTime<Utc>,
}
