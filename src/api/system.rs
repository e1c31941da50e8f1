use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::db::DeliveryLog;
use crate::entities::relay_requests::DeliveryStatus;
use crate::entities::users::Action;
use crate::services::AuthUser;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: bool,
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: String,
    pub uptime: u64,
    pub users: u64,
    pub requests: u64,
    pub delivered: u64,
    pub failed: u64,
}

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    pub outcome: Option<String>,
}

const fn default_page() -> u64 {
    1
}

const fn default_page_size() -> u64 {
    50
}

#[derive(Debug, Serialize)]
pub struct LogResponse {
    pub logs: Vec<LogDto>,
    pub total_pages: u64,
}

#[derive(Debug, Serialize)]
pub struct LogDto {
    pub id: i64,
    pub request_id: i64,
    pub outcome: String,
    pub response: String,
    pub created_at: String,
}

impl From<DeliveryLog> for LogDto {
    fn from(model: DeliveryLog) -> Self {
        Self {
            id: model.id,
            request_id: model.request_id,
            outcome: model.outcome,
            response: model.response,
            created_at: model.created_at,
        }
    }
}

/// GET /health
/// Liveness probe with a database ping, public.
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    let db_ok = state.store.ping().await.is_ok();

    let status = if db_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ApiResponse::success(HealthResponse {
            status: if db_ok { "ok" } else { "degraded" },
            database: db_ok,
        })),
    )
        .into_response()
}

/// GET /api/system/status
/// Request and delivery counters (any authenticated role)
pub async fn get_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SystemStatus>>, ApiError> {
    let users = state.store.count_users().await?;
    let requests = state.store.count_requests().await?;
    let delivered = state
        .store
        .count_requests_with_status(DeliveryStatus::Delivered)
        .await?;
    let failed = state
        .store
        .count_requests_with_status(DeliveryStatus::Failed)
        .await?;

    Ok(Json(ApiResponse::success(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: state.start_time.elapsed().as_secs(),
        users,
        requests,
        delivered,
        failed,
    })))
}

/// GET /api/system/logs
/// Paginated delivery log (admin only)
pub async fn get_logs(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<ApiResponse<LogResponse>>, ApiError> {
    if !user.role.permits(Action::ViewDeliveryLogs) {
        return Err(ApiError::forbidden(
            "Viewing delivery logs requires the admin role",
        ));
    }

    let (logs, total_pages) = state
        .store
        .get_delivery_logs(query.page, query.page_size, query.outcome)
        .await?;

    let dtos: Vec<LogDto> = logs.into_iter().map(LogDto::from).collect();

    Ok(Json(ApiResponse::success(LogResponse {
        logs: dtos,
        total_pages,
    })))
}

#[derive(Debug, Deserialize)]
pub struct ClearLogsQuery {
    /// When set, only entries older than this many days are removed.
    pub older_than_days: Option<i64>,
}

/// DELETE /api/system/logs
/// Clear or prune the delivery log, returns removed row count (admin only)
pub async fn clear_logs(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ClearLogsQuery>,
) -> Result<Json<ApiResponse<u64>>, ApiError> {
    if !user.role.permits(Action::ViewDeliveryLogs) {
        return Err(ApiError::forbidden(
            "Clearing delivery logs requires the admin role",
        ));
    }

    let removed = match query.older_than_days {
        Some(days) => state.store.prune_delivery_logs(days).await?,
        None => state.store.clear_delivery_logs().await?,
    };

    Ok(Json(ApiResponse::success(removed)))
}
