//! HTTP handlers for user directory endpoints

use axum::{extract::State, Json};

use shared::models::user::User;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::UserService;
use crate::AppState;

/// Get the authenticated user's profile
pub async fn get_current_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<User>> {
    let service = UserService::new(state.db);
    let user = service.get(current_user.0.user_id).await?;
    Ok(Json(user))
}

/// List all users
pub async fn list_users(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<User>>> {
    let service = UserService::new(state.db);
    let users = service.list().await?;
    Ok(Json(users))
}
