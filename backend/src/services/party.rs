//! Clients and providers
//!
//! Two near-identical CRUD surfaces plus product-provider linking. A
//! partial unique index keeps at most one primary supplier per product;
//! flagging a new primary demotes the previous one in the same transaction.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::models::party::{Client, ProductProvider, Provider};
use shared::validation::validate_email;

use crate::error::{AppError, AppResult};

/// Clients and providers service
#[derive(Clone)]
pub struct PartyService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct ClientRow {
    id: Uuid,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ClientRow> for Client {
    fn from(row: ClientRow) -> Self {
        Client {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            address: row.address,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct ProviderRow {
    id: Uuid,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ProviderRow> for Provider {
    fn from(row: ProviderRow) -> Self {
        Provider {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            address: row.address,
            created_at: row.created_at,
        }
    }
}

/// Input for creating or updating a client or provider
#[derive(Debug, Deserialize)]
pub struct PartyInput {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Input for linking a provider to a product
#[derive(Debug, Deserialize)]
pub struct LinkProviderInput {
    pub provider_id: Uuid,
    #[serde(default)]
    pub is_primary: bool,
}

fn validate_party(input: &PartyInput) -> AppResult<()> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation {
            field: "name".to_string(),
            message: "Name cannot be empty".to_string(),
        });
    }
    if let Some(email) = &input.email {
        validate_email(email).map_err(|msg| AppError::Validation {
            field: "email".to_string(),
            message: msg.to_string(),
        })?;
    }
    Ok(())
}

impl PartyService {
    /// Create a new PartyService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    // Clients

    pub async fn create_client(&self, input: PartyInput) -> AppResult<Client> {
        validate_party(&input)?;

        let row = sqlx::query_as::<_, ClientRow>(
            r#"
            INSERT INTO clients (name, email, phone, address)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, phone, address, created_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    pub async fn get_client(&self, client_id: Uuid) -> AppResult<Client> {
        let row = sqlx::query_as::<_, ClientRow>(
            "SELECT id, name, email, phone, address, created_at FROM clients WHERE id = $1",
        )
        .bind(client_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Client".to_string()))?;

        Ok(row.into())
    }

    pub async fn list_clients(&self) -> AppResult<Vec<Client>> {
        let rows = sqlx::query_as::<_, ClientRow>(
            "SELECT id, name, email, phone, address, created_at FROM clients ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Client::from).collect())
    }

    pub async fn update_client(&self, client_id: Uuid, input: PartyInput) -> AppResult<Client> {
        validate_party(&input)?;

        let row = sqlx::query_as::<_, ClientRow>(
            r#"
            UPDATE clients
            SET name = $2, email = $3, phone = $4, address = $5
            WHERE id = $1
            RETURNING id, name, email, phone, address, created_at
            "#,
        )
        .bind(client_id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Client".to_string()))?;

        Ok(row.into())
    }

    /// Delete a client. Blocked while orders reference it.
    pub async fn delete_client(&self, client_id: Uuid) -> AppResult<()> {
        let has_orders = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM orders WHERE order_type = 'sale' AND counterparty_id = $1)",
        )
        .bind(client_id)
        .fetch_one(&self.db)
        .await?;

        if has_orders {
            return Err(AppError::ValidationError(
                "Cannot delete a client with recorded orders".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(client_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Client".to_string()));
        }

        Ok(())
    }

    // Providers

    pub async fn create_provider(&self, input: PartyInput) -> AppResult<Provider> {
        validate_party(&input)?;

        let row = sqlx::query_as::<_, ProviderRow>(
            r#"
            INSERT INTO providers (name, email, phone, address)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, phone, address, created_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    pub async fn get_provider(&self, provider_id: Uuid) -> AppResult<Provider> {
        let row = sqlx::query_as::<_, ProviderRow>(
            "SELECT id, name, email, phone, address, created_at FROM providers WHERE id = $1",
        )
        .bind(provider_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Provider".to_string()))?;

        Ok(row.into())
    }

    pub async fn list_providers(&self) -> AppResult<Vec<Provider>> {
        let rows = sqlx::query_as::<_, ProviderRow>(
            "SELECT id, name, email, phone, address, created_at FROM providers ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Provider::from).collect())
    }

    pub async fn update_provider(
        &self,
        provider_id: Uuid,
        input: PartyInput,
    ) -> AppResult<Provider> {
        validate_party(&input)?;

        let row = sqlx::query_as::<_, ProviderRow>(
            r#"
            UPDATE providers
            SET name = $2, email = $3, phone = $4, address = $5
            WHERE id = $1
            RETURNING id, name, email, phone, address, created_at
            "#,
        )
        .bind(provider_id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Provider".to_string()))?;

        Ok(row.into())
    }

    /// Delete a provider. Blocked while orders or product links reference it.
    pub async fn delete_provider(&self, provider_id: Uuid) -> AppResult<()> {
        let referenced = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM orders WHERE order_type = 'purchase' AND counterparty_id = $1)
                OR EXISTS(SELECT 1 FROM product_providers WHERE provider_id = $1)
            "#,
        )
        .bind(provider_id)
        .fetch_one(&self.db)
        .await?;

        if referenced {
            return Err(AppError::ValidationError(
                "Cannot delete a provider that is linked to products or orders".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM providers WHERE id = $1")
            .bind(provider_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Provider".to_string()));
        }

        Ok(())
    }

    // Product-provider links

    /// Link a provider to a product. Flagging it primary demotes any
    /// existing primary in the same transaction.
    pub async fn link_provider(
        &self,
        product_id: Uuid,
        input: LinkProviderInput,
    ) -> AppResult<ProductProvider> {
        let product_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
                .bind(product_id)
                .fetch_one(&self.db)
                .await?;
        if !product_exists {
            return Err(AppError::NotFound("Product".to_string()));
        }

        let provider_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM providers WHERE id = $1)")
                .bind(input.provider_id)
                .fetch_one(&self.db)
                .await?;
        if !provider_exists {
            return Err(AppError::NotFound("Provider".to_string()));
        }

        let mut tx = self.db.begin().await?;

        if input.is_primary {
            sqlx::query(
                "UPDATE product_providers SET is_primary = FALSE WHERE product_id = $1 AND is_primary",
            )
            .bind(product_id)
            .execute(&mut *tx)
            .await?;
        }

        let row = sqlx::query_as::<_, (Uuid, Uuid, bool)>(
            r#"
            INSERT INTO product_providers (product_id, provider_id, is_primary)
            VALUES ($1, $2, $3)
            ON CONFLICT (product_id, provider_id)
            DO UPDATE SET is_primary = EXCLUDED.is_primary
            RETURNING product_id, provider_id, is_primary
            "#,
        )
        .bind(product_id)
        .bind(input.provider_id)
        .bind(input.is_primary)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(ProductProvider {
            product_id: row.0,
            provider_id: row.1,
            is_primary: row.2,
        })
    }

    pub async fn unlink_provider(&self, product_id: Uuid, provider_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "DELETE FROM product_providers WHERE product_id = $1 AND provider_id = $2",
        )
        .bind(product_id)
        .bind(provider_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product-provider link".to_string()));
        }

        Ok(())
    }

    /// Providers linked to a product, primary first
    pub async fn providers_for_product(&self, product_id: Uuid) -> AppResult<Vec<ProductProvider>> {
        let rows = sqlx::query_as::<_, (Uuid, Uuid, bool)>(
            r#"
            SELECT product_id, provider_id, is_primary
            FROM product_providers
            WHERE product_id = $1
            ORDER BY is_primary DESC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(product_id, provider_id, is_primary)| ProductProvider {
                product_id,
                provider_id,
                is_primary,
            })
            .collect())
    }
}
