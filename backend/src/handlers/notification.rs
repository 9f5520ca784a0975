//! HTTP handlers for low-stock notification endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use shared::models::notification::Notification;

use crate::error::{AppError, AppResult};
use crate::external::EmailClient;
use crate::middleware::CurrentUser;
use crate::services::NotificationService;
use crate::AppState;

fn notification_service(state: AppState) -> NotificationService {
    NotificationService::new(
        state.db.clone(),
        state.config.notification.clone(),
        EmailClient::new(&state.config.email),
    )
}

/// List notifications addressed to the current user, pending first
pub async fn list_notifications(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Notification>>> {
    let service = notification_service(state);
    let notifications = service.list_for_user(current_user.0.user_id).await?;
    Ok(Json(notifications))
}

/// Accept a pending notification and dispatch the restock email
pub async fn accept_notification(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(notification_id): Path<Uuid>,
) -> AppResult<Json<Notification>> {
    let service = notification_service(state);
    let notification = service.accept(notification_id).await?;
    Ok(Json(notification))
}

/// Reject a pending notification
pub async fn reject_notification(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(notification_id): Path<Uuid>,
) -> AppResult<Json<Notification>> {
    let service = notification_service(state);
    let notification = service.reject(notification_id).await?;
    Ok(Json(notification))
}

#[derive(Serialize)]
pub struct SweepResponse {
    pub created: u32,
}

/// Run the low-stock sweep on demand (admin only)
pub async fn run_sweep(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<SweepResponse>> {
    if !current_user.0.is_admin() {
        return Err(AppError::InsufficientPermissions);
    }
    let service = notification_service(state);
    let created = service.sweep().await?;
    Ok(Json(SweepResponse { created }))
}
