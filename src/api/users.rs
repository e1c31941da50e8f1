use axum::{Extension, Json, extract::State};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, MessageResponse};
use crate::entities::users::{Action, Role};
use crate::services::{AuthUser, UserInfo};

#[derive(Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    /// One of "admin", "manager", "user". Defaults to "user".
    pub role: Option<String>,
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// POST /api/users
/// Create an account. The role is fixed at creation.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let role = match payload.role.as_deref() {
        None => Role::User,
        Some(name) => Role::from_name(name)
            .ok_or_else(|| ApiError::validation(format!("Unknown role: {name}")))?,
    };

    let user = state
        .auth_service
        .signup(&payload.username, &payload.password, role)
        .await?;

    tracing::info!(username = %user.username, role = user.role.as_str(), "User registered");

    Ok(Json(ApiResponse::success(user)))
}

/// GET /api/users/me
/// Get current user information (requires authentication)
pub async fn me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let info = state.auth_service.get_user_info(&user.username).await?;
    Ok(Json(ApiResponse::success(info)))
}

/// GET /api/users
/// List all accounts (admin only)
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Vec<UserInfo>>>, ApiError> {
    if !user.role.permits(Action::ManageUsers) {
        return Err(ApiError::forbidden("Managing users requires the admin role"));
    }

    let users = state.auth_service.list_users().await?;
    Ok(Json(ApiResponse::success(users)))
}

/// PUT /api/users/password
/// Change password (requires current password verification)
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .auth_service
        .change_password(
            &user.username,
            &payload.current_password,
            &payload.new_password,
        )
        .await?;

    tracing::info!("Password changed for user: {}", user.username);

    Ok(Json(ApiResponse::success(MessageResponse {
        message: "Password updated successfully".to_string(),
    })))
}
