//! Stock ledger and movement journal service
//!
//! The ledger row is the single serialization point for concurrent orders:
//! every adjustment locks the row (`SELECT ... FOR UPDATE`) before the
//! read-modify-write, inside the transaction of the order that triggered it.
//! The journal insert happens on the same transaction, so a rollback leaves
//! neither the adjustment nor the movement behind.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use shared::models::stock::{apply_delta, MovementDirection, StockError, StockMovement, StockRecord};

use crate::error::{AppError, AppResult};

/// Stock service for committed-state reads
#[derive(Clone)]
pub struct StockService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct StockRow {
    id: Uuid,
    product_id: Uuid,
    quantity: i64,
    updated_at: DateTime<Utc>,
}

impl From<StockRow> for StockRecord {
    fn from(row: StockRow) -> Self {
        StockRecord {
            id: row.id,
            product_id: row.product_id,
            quantity: row.quantity,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct MovementRow {
    id: Uuid,
    stock_record_id: Uuid,
    direction: String,
    quantity: i64,
    reason: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<MovementRow> for StockMovement {
    type Error = AppError;

    fn try_from(row: MovementRow) -> Result<Self, Self::Error> {
        let direction = MovementDirection::parse(&row.direction).ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!(
                "unknown movement direction {:?} for movement {}",
                row.direction,
                row.id
            ))
        })?;
        Ok(StockMovement {
            id: row.id,
            stock_record_id: row.stock_record_id,
            direction,
            quantity: row.quantity,
            reason: row.reason,
            created_at: row.created_at,
        })
    }
}

/// A product at or below its minimum-stock threshold
#[derive(Debug, Serialize, FromRow)]
pub struct LowStockProduct {
    pub product_id: Uuid,
    pub code: String,
    pub name: String,
    pub quantity: i64,
    pub min_stock: i64,
}

/// Lock a product's stock row and return (stock_record_id, quantity).
///
/// Must run on the transaction of the enclosing order; the lock is held
/// until that transaction commits or rolls back.
pub async fn lock_stock(conn: &mut PgConnection, product_id: Uuid) -> AppResult<(Uuid, i64)> {
    let row = sqlx::query_as::<_, (Uuid, i64)>(
        "SELECT id, quantity FROM stock_records WHERE product_id = $1 FOR UPDATE",
    )
    .bind(product_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::NotFound("Stock record".to_string()))?;

    Ok(row)
}

/// Apply a signed delta to a locked stock row.
///
/// Fails with `InsufficientStock` when a negative delta would drive the
/// quantity below zero; the caller must abort the enclosing transaction.
/// Returns (stock_record_id, new_quantity).
pub async fn adjust(
    conn: &mut PgConnection,
    product_id: Uuid,
    delta: i64,
    product_code: &str,
) -> AppResult<(Uuid, i64)> {
    let (stock_record_id, current) = lock_stock(conn, product_id).await?;

    let next = apply_delta(current, delta).map_err(|e| match e {
        StockError::Insufficient {
            requested,
            available,
        } => AppError::InsufficientStock {
            product_code: product_code.to_string(),
            requested,
            available,
        },
        StockError::NonPositiveQuantity => {
            AppError::ValidationError("Movement quantity must be positive".to_string())
        }
    })?;

    sqlx::query("UPDATE stock_records SET quantity = $1, updated_at = NOW() WHERE id = $2")
        .bind(next)
        .bind(stock_record_id)
        .execute(&mut *conn)
        .await?;

    Ok((stock_record_id, next))
}

/// Append a journal entry for a ledger change. Pure append; the only
/// validation is quantity > 0.
pub async fn record_movement(
    conn: &mut PgConnection,
    stock_record_id: Uuid,
    direction: MovementDirection,
    quantity: i64,
    reason: &str,
) -> AppResult<()> {
    if quantity <= 0 {
        return Err(AppError::Validation {
            field: "quantity".to_string(),
            message: "Movement quantity must be positive".to_string(),
        });
    }

    sqlx::query(
        r#"
        INSERT INTO stock_movements (stock_record_id, direction, quantity, reason)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(stock_record_id)
    .bind(direction.as_str())
    .bind(quantity)
    .bind(reason)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

impl StockService {
    /// Create a new StockService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Latest committed quantity for a product
    pub async fn current_quantity(&self, product_id: Uuid) -> AppResult<i64> {
        let quantity = sqlx::query_scalar::<_, i64>(
            "SELECT quantity FROM stock_records WHERE product_id = $1",
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Stock record".to_string()))?;

        Ok(quantity)
    }

    /// Stock record for a product
    pub async fn get_record(&self, product_id: Uuid) -> AppResult<StockRecord> {
        let row = sqlx::query_as::<_, StockRow>(
            "SELECT id, product_id, quantity, updated_at FROM stock_records WHERE product_id = $1",
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Stock record".to_string()))?;

        Ok(row.into())
    }

    /// Movement journal for a product, newest first
    pub async fn movements(&self, product_id: Uuid) -> AppResult<Vec<StockMovement>> {
        let rows = sqlx::query_as::<_, MovementRow>(
            r#"
            SELECT m.id, m.stock_record_id, m.direction, m.quantity, m.reason, m.created_at
            FROM stock_movements m
            JOIN stock_records r ON r.id = m.stock_record_id
            WHERE r.product_id = $1
            ORDER BY m.created_at DESC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(StockMovement::try_from).collect()
    }

    /// Products currently at or below their minimum-stock threshold
    pub async fn low_stock(&self) -> AppResult<Vec<LowStockProduct>> {
        let rows = sqlx::query_as::<_, LowStockProduct>(
            r#"
            SELECT p.id as product_id, p.code, p.name, r.quantity, p.min_stock
            FROM products p
            JOIN stock_records r ON r.product_id = p.id
            WHERE r.quantity <= p.min_stock
            ORDER BY r.quantity ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }
}
