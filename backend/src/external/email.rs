//! Outbound email gateway client
//!
//! Fire-and-forget from the caller's perspective: a failed dispatch is
//! reported as an error string for logging, never retried here, and never
//! rolls back the state change that triggered it.

use serde::Serialize;

use crate::config::EmailConfig;

/// Mail gateway client
#[derive(Clone)]
pub struct EmailClient {
    gateway_url: String,
    api_key: String,
    from_address: String,
    http_client: reqwest::Client,
}

/// Low-stock notification message body
#[derive(Debug, Serialize)]
struct LowStockMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: String,
    body: String,
}

impl EmailClient {
    /// Create a new EmailClient from configuration
    pub fn new(config: &EmailConfig) -> Self {
        Self {
            gateway_url: config.gateway_url.clone(),
            api_key: config.api_key.clone(),
            from_address: config.from_address.clone(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Send a low-stock restock request to a supplier contact.
    pub async fn send_low_stock(
        &self,
        recipient: &str,
        product_name: &str,
        supplier_name: &str,
        current_quantity: i64,
        threshold: i64,
    ) -> Result<(), String> {
        let message = LowStockMessage {
            from: &self.from_address,
            to: recipient,
            subject: format!("Low stock: {}", product_name),
            body: format!(
                "Product '{}' is low on stock ({} on hand, threshold {}). \
                 A restock request has been approved for supplier '{}'.",
                product_name, current_quantity, threshold, supplier_name
            ),
        };

        let response = self
            .http_client
            .post(&self.gateway_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&message)
            .send()
            .await
            .map_err(|e| format!("Failed to reach mail gateway: {}", e))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(format!("Mail gateway returned {}", response.status()))
        }
    }
}
