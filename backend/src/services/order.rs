//! Order processing service
//!
//! Turns a counterparty plus a list of (product, quantity) pairs into a
//! persisted, internally consistent order. One transaction per order: line
//! adjustments, journal entries and the header/lines all commit together or
//! not at all. Validation failures are reported before any mutation begins;
//! mid-transaction failures roll everything back. No retries are attempted;
//! the caller resubmits.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use shared::models::order::{
    document_number, line_amounts, Order, OrderLine, OrderTotals, OrderType,
};
use shared::models::stock::{apply_clamped_removal, MovementDirection};
use shared::types::DateRange;
use shared::validation::validate_quantity;

use crate::error::{AppError, AppResult};
use crate::services::notification::NotificationService;
use crate::services::stock;

/// Order processing service
#[derive(Clone)]
pub struct OrderService {
    db: PgPool,
    notifier: NotificationService,
}

/// One requested line of an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineInput {
    pub product_id: Uuid,
    pub quantity: i64,
}

/// Input for creating a sale or purchase
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderInput {
    /// Client id for sales, provider id for purchases
    pub counterparty_id: Uuid,
    #[validate(length(min = 1, message = "Order must have at least one line"))]
    pub lines: Vec<OrderLineInput>,
}

/// An order with its lines
#[derive(Debug, Serialize)]
pub struct OrderWithLines {
    #[serde(flatten)]
    pub order: Order,
    pub lines: Vec<OrderLine>,
}

#[derive(Debug, FromRow)]
struct OrderRow {
    id: Uuid,
    order_type: String,
    document_number: String,
    counterparty_id: Uuid,
    user_id: Uuid,
    subtotal: Decimal,
    tax_amount: Decimal,
    total: Decimal,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = AppError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let order_type = OrderType::parse(&row.order_type).ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!(
                "unknown order type {:?} for order {}",
                row.order_type,
                row.id
            ))
        })?;
        Ok(Order {
            id: row.id,
            order_type,
            document_number: row.document_number,
            counterparty_id: row.counterparty_id,
            user_id: row.user_id,
            subtotal: row.subtotal,
            tax_amount: row.tax_amount,
            total: row.total,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct LineRow {
    id: Uuid,
    order_id: Uuid,
    product_id: Uuid,
    quantity: i64,
    unit_price: Decimal,
    tax_rate: Decimal,
    line_subtotal: Decimal,
}

impl From<LineRow> for OrderLine {
    fn from(row: LineRow) -> Self {
        OrderLine {
            id: row.id,
            order_id: row.order_id,
            product_id: row.product_id,
            quantity: row.quantity,
            unit_price: row.unit_price,
            tax_rate: row.tax_rate,
            line_subtotal: row.line_subtotal,
        }
    }
}

/// Product pricing snapshot read under the order transaction
#[derive(Debug, FromRow)]
struct PricingRow {
    id: Uuid,
    code: String,
    purchase_price: Decimal,
    sale_price: Decimal,
    tax_rate: Decimal,
}

/// Allocate the next per-day sequence for (order type, date).
///
/// Single atomic upsert on the counter row, deliberately outside the order
/// transaction: the row lock is released immediately, so concurrent orders
/// of the same type never serialize on the counter. An order that fails
/// afterwards leaves a gap, never a collision.
async fn next_document_sequence(
    db: &PgPool,
    order_type: OrderType,
    date: NaiveDate,
) -> AppResult<i64> {
    let sequence = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO document_counters (order_type, counter_date, last_value)
        VALUES ($1, $2, 1)
        ON CONFLICT (order_type, counter_date)
        DO UPDATE SET last_value = document_counters.last_value + 1
        RETURNING last_value
        "#,
    )
    .bind(order_type.as_str())
    .bind(date)
    .fetch_one(db)
    .await?;

    Ok(sequence)
}

impl OrderService {
    /// Create a new OrderService instance
    pub fn new(db: PgPool, notifier: NotificationService) -> Self {
        Self { db, notifier }
    }

    /// Process a sale: lock and check each line's stock, snapshot prices and
    /// tax rates, apply outbound adjustments and movements, persist the
    /// order. Any insufficiency aborts the whole order.
    pub async fn create_sale(&self, user_id: Uuid, input: CreateOrderInput) -> AppResult<OrderWithLines> {
        self.validate_input(&input)?;

        let client_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM clients WHERE id = $1)")
                .bind(input.counterparty_id)
                .fetch_one(&self.db)
                .await?;
        if !client_exists {
            return Err(AppError::NotFound("Client".to_string()));
        }

        let order = self
            .process_order(OrderType::Sale, user_id, &input)
            .await?;

        // Sales lower stock; evaluate the touched products. Failures here are
        // logged, never propagated: the order is already committed.
        let products: Vec<Uuid> = order.lines.iter().map(|l| l.product_id).collect();
        if let Err(e) = self.notifier.evaluate_products(&products).await {
            tracing::warn!(
                document = %order.order.document_number,
                "low-stock evaluation after sale failed: {}",
                e
            );
        }

        Ok(order)
    }

    /// Process a purchase: inbound movements, positive deltas, no
    /// stock-sufficiency check.
    pub async fn create_purchase(
        &self,
        user_id: Uuid,
        input: CreateOrderInput,
    ) -> AppResult<OrderWithLines> {
        self.validate_input(&input)?;

        let provider_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM providers WHERE id = $1)")
                .bind(input.counterparty_id)
                .fetch_one(&self.db)
                .await?;
        if !provider_exists {
            return Err(AppError::NotFound("Provider".to_string()));
        }

        self.process_order(OrderType::Purchase, user_id, &input).await
    }

    fn validate_input(&self, input: &CreateOrderInput) -> AppResult<()> {
        input.validate().map_err(|e| AppError::ValidationError(e.to_string()))?;
        for (idx, line) in input.lines.iter().enumerate() {
            validate_quantity(line.quantity).map_err(|msg| AppError::Validation {
                field: format!("lines[{}].quantity", idx),
                message: msg.to_string(),
            })?;
        }
        Ok(())
    }

    async fn process_order(
        &self,
        order_type: OrderType,
        user_id: Uuid,
        input: &CreateOrderInput,
    ) -> AppResult<OrderWithLines> {
        let today = Utc::now().date_naive();
        let sequence = next_document_sequence(&self.db, order_type, today).await?;
        let doc_number = document_number(order_type, today, sequence);

        let mut tx = self.db.begin().await?;

        // (product_id, quantity, unit price, tax rate) snapshots
        let mut snapshots: Vec<(Uuid, i64, Decimal, Decimal)> =
            Vec::with_capacity(input.lines.len());

        for line in &input.lines {
            let pricing = sqlx::query_as::<_, PricingRow>(
                r#"
                SELECT p.id, p.code, p.purchase_price, p.sale_price, t.rate as tax_rate
                FROM products p
                JOIN taxes t ON t.id = p.tax_id
                WHERE p.id = $1
                "#,
            )
            .bind(line.product_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

            let (delta, direction, unit_price) = match order_type {
                OrderType::Sale => (-line.quantity, MovementDirection::Out, pricing.sale_price),
                OrderType::Purchase => {
                    (line.quantity, MovementDirection::In, pricing.purchase_price)
                }
            };

            let (stock_record_id, _) =
                stock::adjust(&mut tx, pricing.id, delta, &pricing.code).await?;
            stock::record_movement(
                &mut tx,
                stock_record_id,
                direction,
                line.quantity,
                &format!("{} {}", order_type.as_str(), doc_number),
            )
            .await?;

            snapshots.push((pricing.id, line.quantity, unit_price, pricing.tax_rate));
        }

        let totals = OrderTotals::compute(snapshots.iter().map(|(_, q, p, r)| (*q, *p, *r)));

        let order_row = sqlx::query_as::<_, OrderRow>(
            r#"
            INSERT INTO orders (order_type, document_number, counterparty_id, user_id,
                                subtotal, tax_amount, total)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, order_type, document_number, counterparty_id, user_id,
                      subtotal, tax_amount, total, created_at
            "#,
        )
        .bind(order_type.as_str())
        .bind(&doc_number)
        .bind(input.counterparty_id)
        .bind(user_id)
        .bind(totals.subtotal)
        .bind(totals.tax_amount)
        .bind(totals.total)
        .fetch_one(&mut *tx)
        .await?;

        let mut lines = Vec::with_capacity(snapshots.len());
        for (product_id, quantity, unit_price, tax_rate) in &snapshots {
            let amounts = line_amounts(*quantity, *unit_price, *tax_rate);
            let line_row = sqlx::query_as::<_, LineRow>(
                r#"
                INSERT INTO order_lines (order_id, product_id, quantity, unit_price,
                                         tax_rate, line_subtotal)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id, order_id, product_id, quantity, unit_price, tax_rate, line_subtotal
                "#,
            )
            .bind(order_row.id)
            .bind(product_id)
            .bind(quantity)
            .bind(unit_price)
            .bind(tax_rate)
            .bind(amounts.subtotal)
            .fetch_one(&mut *tx)
            .await?;
            lines.push(line_row.into());
        }

        tx.commit().await?;

        tracing::info!(
            document = %doc_number,
            order_type = order_type.as_str(),
            lines = lines.len(),
            "order committed"
        );

        Ok(OrderWithLines {
            order: order_row.try_into()?,
            lines,
        })
    }

    /// Reverse and remove an order.
    ///
    /// Sale deletion restores each line's stock; purchase deletion removes
    /// stock floored at zero. The original movements stay in the journal;
    /// the reversal appends compensating entries referencing the original
    /// document number.
    pub async fn delete_order(&self, order_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let (order_type_raw, doc_number) = sqlx::query_as::<_, (String, String)>(
            "SELECT order_type, document_number FROM orders WHERE id = $1 FOR UPDATE",
        )
        .bind(order_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

        let order_type = OrderType::parse(&order_type_raw).ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("unknown order type {:?}", order_type_raw))
        })?;

        let lines = sqlx::query_as::<_, (Uuid, i64)>(
            "SELECT product_id, quantity FROM order_lines WHERE order_id = $1",
        )
        .bind(order_id)
        .fetch_all(&mut *tx)
        .await?;

        let mut touched: Vec<Uuid> = Vec::with_capacity(lines.len());

        for (product_id, quantity) in &lines {
            let code = sqlx::query_scalar::<_, String>("SELECT code FROM products WHERE id = $1")
                .bind(product_id)
                .fetch_one(&mut *tx)
                .await?;

            match order_type {
                OrderType::Sale => {
                    let (stock_record_id, _) =
                        stock::adjust(&mut tx, *product_id, *quantity, &code).await?;
                    stock::record_movement(
                        &mut tx,
                        stock_record_id,
                        MovementDirection::In,
                        *quantity,
                        &format!("reversal of sale {}", doc_number),
                    )
                    .await?;
                }
                OrderType::Purchase => {
                    let (stock_record_id, current) = stock::lock_stock(&mut tx, *product_id).await?;
                    let (next, removed) = apply_clamped_removal(current, *quantity);
                    if removed > 0 {
                        sqlx::query(
                            "UPDATE stock_records SET quantity = $1, updated_at = NOW() WHERE id = $2",
                        )
                        .bind(next)
                        .bind(stock_record_id)
                        .execute(&mut *tx)
                        .await?;
                        stock::record_movement(
                            &mut tx,
                            stock_record_id,
                            MovementDirection::Out,
                            removed,
                            &format!("reversal of purchase {}", doc_number),
                        )
                        .await?;
                    }
                    touched.push(*product_id);
                }
            }
        }

        sqlx::query("DELETE FROM order_lines WHERE order_id = $1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(document = %doc_number, "order reversed and removed");

        // Purchase reversals lower stock; re-evaluate those products.
        if !touched.is_empty() {
            if let Err(e) = self.notifier.evaluate_products(&touched).await {
                tracing::warn!(
                    document = %doc_number,
                    "low-stock evaluation after reversal failed: {}",
                    e
                );
            }
        }

        Ok(())
    }

    /// Get an order with its lines
    pub async fn get_order(&self, order_id: Uuid) -> AppResult<OrderWithLines> {
        let order_row = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, order_type, document_number, counterparty_id, user_id,
                   subtotal, tax_amount, total, created_at
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

        let lines = sqlx::query_as::<_, LineRow>(
            r#"
            SELECT id, order_id, product_id, quantity, unit_price, tax_rate, line_subtotal
            FROM order_lines
            WHERE order_id = $1
            ORDER BY id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.db)
        .await?;

        Ok(OrderWithLines {
            order: order_row.try_into()?,
            lines: lines.into_iter().map(OrderLine::from).collect(),
        })
    }

    /// List orders of one type, optionally restricted to a date range,
    /// newest first
    pub async fn list_orders(
        &self,
        order_type: OrderType,
        range: Option<&DateRange>,
    ) -> AppResult<Vec<Order>> {
        let rows = match range {
            Some(range) => {
                sqlx::query_as::<_, OrderRow>(
                    r#"
                    SELECT id, order_type, document_number, counterparty_id, user_id,
                           subtotal, tax_amount, total, created_at
                    FROM orders
                    WHERE order_type = $1
                      AND created_at::date BETWEEN $2 AND $3
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(order_type.as_str())
                .bind(range.start)
                .bind(range.end)
                .fetch_all(&self.db)
                .await?
            }
            None => {
                sqlx::query_as::<_, OrderRow>(
                    r#"
                    SELECT id, order_type, document_number, counterparty_id, user_id,
                           subtotal, tax_amount, total, created_at
                    FROM orders
                    WHERE order_type = $1
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(order_type.as_str())
                .fetch_all(&self.db)
                .await?
            }
        };

        rows.into_iter().map(Order::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(quantity: i64) -> OrderLineInput {
        OrderLineInput {
            product_id: Uuid::new_v4(),
            quantity,
        }
    }

    #[test]
    fn order_without_lines_fails_validation() {
        let input = CreateOrderInput {
            counterparty_id: Uuid::new_v4(),
            lines: vec![],
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn order_with_lines_passes_validation() {
        let input = CreateOrderInput {
            counterparty_id: Uuid::new_v4(),
            lines: vec![line(1), line(40)],
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn line_input_serializes_for_validation_params() {
        let json = serde_json::to_value(line(3)).unwrap();
        assert_eq!(json["quantity"], 3);
    }
}
