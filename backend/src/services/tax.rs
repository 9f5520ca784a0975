//! Tax definitions
//!
//! Order lines snapshot the rate at order time, so editing a tax never
//! rewrites history; deletion is blocked while products reference it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::models::tax::Tax;
use shared::validation::validate_tax_rate;

use crate::error::{AppError, AppResult};

/// Tax definitions service
#[derive(Clone)]
pub struct TaxService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct TaxRow {
    id: Uuid,
    name: String,
    rate: Decimal,
    created_at: DateTime<Utc>,
}

impl From<TaxRow> for Tax {
    fn from(row: TaxRow) -> Self {
        Tax {
            id: row.id,
            name: row.name,
            rate: row.rate,
            created_at: row.created_at,
        }
    }
}

/// Input for creating or updating a tax
#[derive(Debug, Deserialize)]
pub struct TaxInput {
    pub name: String,
    pub rate: Decimal,
}

fn validate_tax(input: &TaxInput) -> AppResult<()> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation {
            field: "name".to_string(),
            message: "Name cannot be empty".to_string(),
        });
    }
    validate_tax_rate(input.rate).map_err(|msg| AppError::Validation {
        field: "rate".to_string(),
        message: msg.to_string(),
    })?;
    Ok(())
}

impl TaxService {
    /// Create a new TaxService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn create(&self, input: TaxInput) -> AppResult<Tax> {
        validate_tax(&input)?;

        let row = sqlx::query_as::<_, TaxRow>(
            r#"
            INSERT INTO taxes (name, rate)
            VALUES ($1, $2)
            RETURNING id, name, rate, created_at
            "#,
        )
        .bind(&input.name)
        .bind(input.rate)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    pub async fn get(&self, tax_id: Uuid) -> AppResult<Tax> {
        let row = sqlx::query_as::<_, TaxRow>(
            "SELECT id, name, rate, created_at FROM taxes WHERE id = $1",
        )
        .bind(tax_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Tax".to_string()))?;

        Ok(row.into())
    }

    pub async fn list(&self) -> AppResult<Vec<Tax>> {
        let rows = sqlx::query_as::<_, TaxRow>(
            "SELECT id, name, rate, created_at FROM taxes ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Tax::from).collect())
    }

    /// Update a tax definition. Only affects future orders; recorded
    /// order lines carry their own rate snapshot.
    pub async fn update(&self, tax_id: Uuid, input: TaxInput) -> AppResult<Tax> {
        validate_tax(&input)?;

        let row = sqlx::query_as::<_, TaxRow>(
            r#"
            UPDATE taxes
            SET name = $2, rate = $3
            WHERE id = $1
            RETURNING id, name, rate, created_at
            "#,
        )
        .bind(tax_id)
        .bind(&input.name)
        .bind(input.rate)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Tax".to_string()))?;

        Ok(row.into())
    }

    pub async fn delete(&self, tax_id: Uuid) -> AppResult<()> {
        let referenced =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM products WHERE tax_id = $1)")
                .bind(tax_id)
                .fetch_one(&self.db)
                .await?;

        if referenced {
            return Err(AppError::ValidationError(
                "Cannot delete a tax that products reference".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM taxes WHERE id = $1")
            .bind(tax_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Tax".to_string()));
        }

        Ok(())
    }
}
