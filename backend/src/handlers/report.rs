//! HTTP handlers for reporting endpoints

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use shared::models::order::OrderType;
use shared::types::DateRange;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::report::{PeriodSummary, TopProduct, ValuationEntry};
use crate::services::ReportService;
use crate::AppState;

/// Period parameters for report queries
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub limit: Option<i64>,
}

impl ReportQuery {
    fn range(&self) -> AppResult<DateRange> {
        if self.end < self.start {
            return Err(AppError::Validation {
                field: "end".to_string(),
                message: "End date must not precede start date".to_string(),
            });
        }
        Ok(DateRange {
            start: self.start,
            end: self.end,
        })
    }
}

/// Sales totals over a period
pub async fn sales_summary(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<PeriodSummary>> {
    let service = ReportService::new(state.db);
    let summary = service
        .period_summary(OrderType::Sale, &query.range()?)
        .await?;
    Ok(Json(summary))
}

/// Purchase totals over a period
pub async fn purchases_summary(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<PeriodSummary>> {
    let service = ReportService::new(state.db);
    let summary = service
        .period_summary(OrderType::Purchase, &query.range()?)
        .await?;
    Ok(Json(summary))
}

/// Best-selling products over a period
pub async fn top_products(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<Vec<TopProduct>>> {
    let service = ReportService::new(state.db);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    let products = service.top_products(&query.range()?, limit).await?;
    Ok(Json(products))
}

/// Current inventory valued at purchase price
pub async fn inventory_valuation(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<ValuationEntry>>> {
    let service = ReportService::new(state.db);
    let valuation = service.inventory_valuation().await?;
    Ok(Json(valuation))
}

/// Export sales order lines as CSV
pub async fn export_sales_csv(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<ReportQuery>,
) -> AppResult<impl IntoResponse> {
    export_csv(state, OrderType::Sale, query).await
}

/// Export purchase order lines as CSV
pub async fn export_purchases_csv(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<ReportQuery>,
) -> AppResult<impl IntoResponse> {
    export_csv(state, OrderType::Purchase, query).await
}

async fn export_csv(
    state: AppState,
    order_type: OrderType,
    query: ReportQuery,
) -> AppResult<impl IntoResponse> {
    let service = ReportService::new(state.db);
    let rows = service
        .order_export_rows(order_type, &query.range()?)
        .await?;
    let csv_data = ReportService::export_to_csv(&rows)?;

    let filename = format!(
        "{}s_{}_{}.csv",
        order_type.as_str(),
        query.start,
        query.end
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        csv_data,
    ))
}
