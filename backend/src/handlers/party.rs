//! HTTP handlers for client and provider endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use shared::models::party::{Client, ProductProvider, Provider};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::party::{LinkProviderInput, PartyInput};
use crate::services::PartyService;
use crate::AppState;

// Clients

pub async fn create_client(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(input): Json<PartyInput>,
) -> AppResult<Json<Client>> {
    let service = PartyService::new(state.db);
    let client = service.create_client(input).await?;
    Ok(Json(client))
}

pub async fn get_client(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(client_id): Path<Uuid>,
) -> AppResult<Json<Client>> {
    let service = PartyService::new(state.db);
    let client = service.get_client(client_id).await?;
    Ok(Json(client))
}

pub async fn list_clients(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<Client>>> {
    let service = PartyService::new(state.db);
    let clients = service.list_clients().await?;
    Ok(Json(clients))
}

pub async fn update_client(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(client_id): Path<Uuid>,
    Json(input): Json<PartyInput>,
) -> AppResult<Json<Client>> {
    let service = PartyService::new(state.db);
    let client = service.update_client(client_id, input).await?;
    Ok(Json(client))
}

pub async fn delete_client(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(client_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = PartyService::new(state.db);
    service.delete_client(client_id).await?;
    Ok(Json(()))
}

// Providers

pub async fn create_provider(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(input): Json<PartyInput>,
) -> AppResult<Json<Provider>> {
    let service = PartyService::new(state.db);
    let provider = service.create_provider(input).await?;
    Ok(Json(provider))
}

pub async fn get_provider(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(provider_id): Path<Uuid>,
) -> AppResult<Json<Provider>> {
    let service = PartyService::new(state.db);
    let provider = service.get_provider(provider_id).await?;
    Ok(Json(provider))
}

pub async fn list_providers(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<Provider>>> {
    let service = PartyService::new(state.db);
    let providers = service.list_providers().await?;
    Ok(Json(providers))
}

pub async fn update_provider(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(provider_id): Path<Uuid>,
    Json(input): Json<PartyInput>,
) -> AppResult<Json<Provider>> {
    let service = PartyService::new(state.db);
    let provider = service.update_provider(provider_id, input).await?;
    Ok(Json(provider))
}

pub async fn delete_provider(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(provider_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = PartyService::new(state.db);
    service.delete_provider(provider_id).await?;
    Ok(Json(()))
}

// Product-provider links

pub async fn link_provider(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
    Json(input): Json<LinkProviderInput>,
) -> AppResult<Json<ProductProvider>> {
    let service = PartyService::new(state.db);
    let link = service.link_provider(product_id, input).await?;
    Ok(Json(link))
}

pub async fn unlink_provider(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path((product_id, provider_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<()>> {
    let service = PartyService::new(state.db);
    service.unlink_provider(product_id, provider_id).await?;
    Ok(Json(()))
}

pub async fn list_product_providers(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Vec<ProductProvider>>> {
    let service = PartyService::new(state.db);
    let links = service.providers_for_product(product_id).await?;
    Ok(Json(links))
}
