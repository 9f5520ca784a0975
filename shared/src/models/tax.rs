//! Tax configuration

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named tax rate, referenced by products and snapshotted into order lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tax {
    pub id: Uuid,
    pub name: String,
    /// Rate in percent (0-100)
    pub rate: Decimal,
    pub created_at: DateTime<Utc>,
}
