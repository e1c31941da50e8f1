use axum::{
    Extension, Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::entities::users::Action;
use crate::services::{AuthUser, DeliveryLogEntry, NewRelayRequest, RelayRequestInfo};

/// POST /api/requests
/// Accept a message, relay it to the messaging API, and record the
/// delivery outcome. A failed delivery still creates the request.
pub async fn create_request(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<NewRelayRequest>,
) -> Result<Json<ApiResponse<RelayRequestInfo>>, ApiError> {
    if !user.role.permits(Action::SubmitRequest) {
        return Err(ApiError::forbidden(
            "Submitting requests is not permitted for this role",
        ));
    }

    let info = state.relay_service.submit(user.id, payload).await?;
    Ok(Json(ApiResponse::success(info)))
}

/// GET /api/requests
/// Managers and admins see every request, plain users only their own.
pub async fn list_requests(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Vec<RelayRequestInfo>>>, ApiError> {
    let requests = if user.role.permits(Action::ListAllRequests) {
        state.relay_service.list_all().await?
    } else {
        state.relay_service.list_for_user(user.id).await?
    };

    Ok(Json(ApiResponse::success(requests)))
}

/// GET /api/requests/{id}
pub async fn get_request(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<RelayRequestInfo>>, ApiError> {
    let request = state
        .relay_service
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Relay request", id))?;

    // Foreign rows stay invisible to callers without list-all rights.
    if request.user_id != user.id && !user.role.permits(Action::ListAllRequests) {
        return Err(ApiError::not_found("Relay request", id));
    }

    Ok(Json(ApiResponse::success(request)))
}

/// GET /api/requests/{id}/log
/// Delivery log rows for one request (admin only)
pub async fn get_request_log(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<DeliveryLogEntry>>>, ApiError> {
    if !user.role.permits(Action::ViewDeliveryLogs) {
        return Err(ApiError::forbidden(
            "Viewing delivery logs requires the admin role",
        ));
    }

    let entries = state.relay_service.delivery_log(id).await?;
    Ok(Json(ApiResponse::success(entries)))
}
