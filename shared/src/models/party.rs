//! Clients and providers (counterparties)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A client the business sells to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A provider the business purchases from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Link between a product and a provider. At most one provider per product
/// carries the primary flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductProvider {
    pub product_id: Uuid,
    pub provider_id: Uuid,
    pub is_primary: bool,
}
