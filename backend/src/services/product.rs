//! Product catalog service
//!
//! Creating a product also creates its stock record at zero, in the same
//! transaction; the ledger row exists for the product's whole life.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::models::product::Product;
use shared::validation::{validate_amount, validate_product_code};

use crate::error::{AppError, AppResult};

/// Product catalog service
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct ProductRow {
    id: Uuid,
    code: String,
    name: String,
    category: Option<String>,
    purchase_price: Decimal,
    sale_price: Decimal,
    min_stock: i64,
    tax_id: Uuid,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            code: row.code,
            name: row.name,
            category: row.category,
            purchase_price: row.purchase_price,
            sale_price: row.sale_price,
            min_stock: row.min_stock,
            tax_id: row.tax_id,
            created_at: row.created_at,
        }
    }
}

/// Input for creating a product
#[derive(Debug, Deserialize)]
pub struct CreateProductInput {
    pub code: String,
    pub name: String,
    pub category: Option<String>,
    pub purchase_price: Decimal,
    pub sale_price: Decimal,
    pub min_stock: i64,
    pub tax_id: Uuid,
}

/// Input for updating a product; identity (code) is immutable
#[derive(Debug, Deserialize)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub category: Option<String>,
    pub purchase_price: Option<Decimal>,
    pub sale_price: Option<Decimal>,
    pub min_stock: Option<i64>,
    pub tax_id: Option<Uuid>,
}

const SELECT_PRODUCT: &str = r#"
    SELECT id, code, name, category, purchase_price, sale_price, min_stock, tax_id, created_at
    FROM products
"#;

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a product and its zero-quantity stock record
    pub async fn create(&self, input: CreateProductInput) -> AppResult<Product> {
        validate_product_code(&input.code).map_err(|msg| AppError::Validation {
            field: "code".to_string(),
            message: msg.to_string(),
        })?;
        validate_amount(input.purchase_price).map_err(|msg| AppError::Validation {
            field: "purchase_price".to_string(),
            message: msg.to_string(),
        })?;
        validate_amount(input.sale_price).map_err(|msg| AppError::Validation {
            field: "sale_price".to_string(),
            message: msg.to_string(),
        })?;
        if input.min_stock < 0 {
            return Err(AppError::Validation {
                field: "min_stock".to_string(),
                message: "Minimum stock cannot be negative".to_string(),
            });
        }
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Name cannot be empty".to_string(),
            });
        }

        let code_taken =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM products WHERE code = $1)")
                .bind(&input.code)
                .fetch_one(&self.db)
                .await?;
        if code_taken {
            return Err(AppError::DuplicateEntry("code".to_string()));
        }

        let tax_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM taxes WHERE id = $1)")
                .bind(input.tax_id)
                .fetch_one(&self.db)
                .await?;
        if !tax_exists {
            return Err(AppError::NotFound("Tax".to_string()));
        }

        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (code, name, category, purchase_price, sale_price, min_stock, tax_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, code, name, category, purchase_price, sale_price, min_stock, tax_id, created_at
            "#,
        )
        .bind(&input.code)
        .bind(&input.name)
        .bind(&input.category)
        .bind(input.purchase_price)
        .bind(input.sale_price)
        .bind(input.min_stock)
        .bind(input.tax_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO stock_records (product_id, quantity) VALUES ($1, 0)")
            .bind(row.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// Get a product by ID
    pub async fn get(&self, product_id: Uuid) -> AppResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(&format!("{} WHERE id = $1", SELECT_PRODUCT))
            .bind(product_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(row.into())
    }

    /// List products ordered by code
    pub async fn list(&self) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!("{} ORDER BY code", SELECT_PRODUCT))
            .fetch_all(&self.db)
            .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Update mutable product fields (pricing, threshold, tax reference)
    pub async fn update(&self, product_id: Uuid, input: UpdateProductInput) -> AppResult<Product> {
        if let Some(price) = input.purchase_price {
            validate_amount(price).map_err(|msg| AppError::Validation {
                field: "purchase_price".to_string(),
                message: msg.to_string(),
            })?;
        }
        if let Some(price) = input.sale_price {
            validate_amount(price).map_err(|msg| AppError::Validation {
                field: "sale_price".to_string(),
                message: msg.to_string(),
            })?;
        }
        if let Some(min_stock) = input.min_stock {
            if min_stock < 0 {
                return Err(AppError::Validation {
                    field: "min_stock".to_string(),
                    message: "Minimum stock cannot be negative".to_string(),
                });
            }
        }
        if let Some(tax_id) = input.tax_id {
            let tax_exists =
                sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM taxes WHERE id = $1)")
                    .bind(tax_id)
                    .fetch_one(&self.db)
                    .await?;
            if !tax_exists {
                return Err(AppError::NotFound("Tax".to_string()));
            }
        }

        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            UPDATE products SET
                name = COALESCE($2, name),
                category = COALESCE($3, category),
                purchase_price = COALESCE($4, purchase_price),
                sale_price = COALESCE($5, sale_price),
                min_stock = COALESCE($6, min_stock),
                tax_id = COALESCE($7, tax_id)
            WHERE id = $1
            RETURNING id, code, name, category, purchase_price, sale_price, min_stock, tax_id, created_at
            "#,
        )
        .bind(product_id)
        .bind(&input.name)
        .bind(&input.category)
        .bind(input.purchase_price)
        .bind(input.sale_price)
        .bind(input.min_stock)
        .bind(input.tax_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(row.into())
    }

    /// Delete a product. Blocked while movements exist: history stays intact.
    pub async fn delete(&self, product_id: Uuid) -> AppResult<()> {
        let has_movements = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM stock_movements m
                JOIN stock_records r ON r.id = m.stock_record_id
                WHERE r.product_id = $1
            )
            "#,
        )
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;

        if has_movements {
            return Err(AppError::ValidationError(
                "Cannot delete a product with recorded stock movements".to_string(),
            ));
        }

        let mut tx = self.db.begin().await?;

        sqlx::query("DELETE FROM product_providers WHERE product_id = $1")
            .bind(product_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM stock_records WHERE product_id = $1")
            .bind(product_id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(product_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        tx.commit().await?;

        Ok(())
    }
}
