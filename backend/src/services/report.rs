//! Reporting service for period summaries and data export

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use shared::models::order::OrderType;
use shared::types::DateRange;

use crate::error::{AppError, AppResult};

/// Reporting service
#[derive(Clone)]
pub struct ReportService {
    db: PgPool,
}

/// Aggregate figures for one order type over a period
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct PeriodSummary {
    pub order_count: i64,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
}

/// Sales ranking entry
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct TopProduct {
    pub product_id: Uuid,
    pub code: String,
    pub name: String,
    pub units_sold: i64,
    pub revenue: Decimal,
}

/// Inventory valuation entry (at purchase price)
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ValuationEntry {
    pub product_id: Uuid,
    pub code: String,
    pub name: String,
    pub quantity: i64,
    pub purchase_price: Decimal,
    pub value: Decimal,
}

/// One exported order row, flat for CSV
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct OrderExportRow {
    pub document_number: String,
    pub order_date: chrono::NaiveDate,
    pub counterparty: String,
    pub product_code: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub tax_rate: Decimal,
    pub line_subtotal: Decimal,
}

impl ReportService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Order totals for one order type over a date range
    pub async fn period_summary(
        &self,
        order_type: OrderType,
        range: &DateRange,
    ) -> AppResult<PeriodSummary> {
        let summary = sqlx::query_as::<_, PeriodSummary>(
            r#"
            SELECT
                COUNT(*) as order_count,
                COALESCE(SUM(subtotal), 0) as subtotal,
                COALESCE(SUM(tax_amount), 0) as tax_amount,
                COALESCE(SUM(total), 0) as total
            FROM orders
            WHERE order_type = $1 AND created_at::date BETWEEN $2 AND $3
            "#,
        )
        .bind(order_type.as_str())
        .bind(range.start)
        .bind(range.end)
        .fetch_one(&self.db)
        .await?;

        Ok(summary)
    }

    /// Best-selling products by units over a date range
    pub async fn top_products(
        &self,
        range: &DateRange,
        limit: i64,
    ) -> AppResult<Vec<TopProduct>> {
        let rows = sqlx::query_as::<_, TopProduct>(
            r#"
            SELECT
                p.id as product_id,
                p.code,
                p.name,
                SUM(l.quantity) as units_sold,
                SUM(l.line_subtotal) as revenue
            FROM order_lines l
            JOIN orders o ON o.id = l.order_id
            JOIN products p ON p.id = l.product_id
            WHERE o.order_type = 'sale' AND o.created_at::date BETWEEN $1 AND $2
            GROUP BY p.id, p.code, p.name
            ORDER BY units_sold DESC
            LIMIT $3
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Current stock valued at purchase price
    pub async fn inventory_valuation(&self) -> AppResult<Vec<ValuationEntry>> {
        let rows = sqlx::query_as::<_, ValuationEntry>(
            r#"
            SELECT
                p.id as product_id,
                p.code,
                p.name,
                r.quantity,
                p.purchase_price,
                r.quantity * p.purchase_price as value
            FROM products p
            JOIN stock_records r ON r.product_id = p.id
            ORDER BY p.code
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Flat order-line rows for one order type over a date range
    pub async fn order_export_rows(
        &self,
        order_type: OrderType,
        range: &DateRange,
    ) -> AppResult<Vec<OrderExportRow>> {
        let counterparty_table = match order_type {
            OrderType::Sale => "clients",
            OrderType::Purchase => "providers",
        };

        let rows = sqlx::query_as::<_, OrderExportRow>(&format!(
            r#"
            SELECT
                o.document_number,
                o.created_at::date as order_date,
                c.name as counterparty,
                p.code as product_code,
                l.quantity,
                l.unit_price,
                l.tax_rate,
                l.line_subtotal
            FROM order_lines l
            JOIN orders o ON o.id = l.order_id
            JOIN products p ON p.id = l.product_id
            JOIN {counterparty_table} c ON c.id = o.counterparty_id
            WHERE o.order_type = $1 AND o.created_at::date BETWEEN $2 AND $3
            ORDER BY order_date, o.document_number
            "#
        ))
        .bind(order_type.as_str())
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Export report data as CSV
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record).map_err(|e| {
                AppError::Internal(anyhow::anyhow!("CSV serialization error: {}", e))
            })?;
        }
        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::Internal(anyhow::anyhow!("CSV writer error: {}", e)))?,
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("CSV encoding error: {}", e)))?;

        Ok(csv_data)
    }
}
