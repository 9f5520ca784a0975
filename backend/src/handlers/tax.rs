//! HTTP handlers for tax definition endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use shared::models::tax::Tax;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::tax::TaxInput;
use crate::services::TaxService;
use crate::AppState;

pub async fn create_tax(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(input): Json<TaxInput>,
) -> AppResult<Json<Tax>> {
    let service = TaxService::new(state.db);
    let tax = service.create(input).await?;
    Ok(Json(tax))
}

pub async fn get_tax(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(tax_id): Path<Uuid>,
) -> AppResult<Json<Tax>> {
    let service = TaxService::new(state.db);
    let tax = service.get(tax_id).await?;
    Ok(Json(tax))
}

pub async fn list_taxes(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<Tax>>> {
    let service = TaxService::new(state.db);
    let taxes = service.list().await?;
    Ok(Json(taxes))
}

pub async fn update_tax(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(tax_id): Path<Uuid>,
    Json(input): Json<TaxInput>,
) -> AppResult<Json<Tax>> {
    let service = TaxService::new(state.db);
    let tax = service.update(tax_id, input).await?;
    Ok(Json(tax))
}

pub async fn delete_tax(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(tax_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = TaxService::new(state.db);
    service.delete(tax_id).await?;
    Ok(Json(()))
}
