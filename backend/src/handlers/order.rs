//! HTTP handlers for sale and purchase order endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use shared::models::order::{Order, OrderType};
use shared::types::DateRange;

use crate::error::AppResult;
use crate::external::EmailClient;
use crate::middleware::CurrentUser;
use crate::services::order::{CreateOrderInput, OrderWithLines};
use crate::services::{NotificationService, OrderService};
use crate::AppState;

/// Date filter for order listings; both bounds or neither
#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl OrderListQuery {
    fn range(&self) -> Option<DateRange> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some(DateRange { start, end }),
            _ => None,
        }
    }
}

fn order_service(state: AppState) -> OrderService {
    let notifier = NotificationService::new(
        state.db.clone(),
        state.config.notification.clone(),
        EmailClient::new(&state.config.email),
    );
    OrderService::new(state.db, notifier)
}

/// Create a sale
pub async fn create_sale(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateOrderInput>,
) -> AppResult<Json<OrderWithLines>> {
    let service = order_service(state);
    let order = service.create_sale(current_user.0.user_id, input).await?;
    Ok(Json(order))
}

/// List sales
pub async fn list_sales(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let service = order_service(state);
    let orders = service
        .list_orders(OrderType::Sale, query.range().as_ref())
        .await?;
    Ok(Json(orders))
}

/// Get a sale or purchase with its lines
pub async fn get_order(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<OrderWithLines>> {
    let service = order_service(state);
    let order = service.get_order(order_id).await?;
    Ok(Json(order))
}

/// Reverse and remove an order
pub async fn delete_order(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = order_service(state);
    service.delete_order(order_id).await?;
    Ok(Json(()))
}

/// Create a purchase
pub async fn create_purchase(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateOrderInput>,
) -> AppResult<Json<OrderWithLines>> {
    let service = order_service(state);
    let order = service
        .create_purchase(current_user.0.user_id, input)
        .await?;
    Ok(Json(order))
}

/// List purchases
pub async fn list_purchases(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let service = order_service(state);
    let orders = service
        .list_orders(OrderType::Purchase, query.range().as_ref())
        .await?;
    Ok(Json(orders))
}
