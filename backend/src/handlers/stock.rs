//! HTTP handlers for stock ledger endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use shared::models::stock::{StockMovement, StockRecord};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::stock::LowStockProduct;
use crate::services::StockService;
use crate::AppState;

/// Get the stock record for a product
pub async fn get_stock_record(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<StockRecord>> {
    let service = StockService::new(state.db);
    let record = service.get_record(product_id).await?;
    Ok(Json(record))
}

/// Get the movement journal for a product
pub async fn get_stock_movements(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Vec<StockMovement>>> {
    let service = StockService::new(state.db);
    let movements = service.movements(product_id).await?;
    Ok(Json(movements))
}

/// List products at or below their minimum-stock threshold
pub async fn list_low_stock(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<LowStockProduct>>> {
    let service = StockService::new(state.db);
    let products = service.low_stock().await?;
    Ok(Json(products))
}
