//! Domain service for accepting relay requests and forwarding them to the
//! messaging API.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::relay_requests::DeliveryStatus;

/// Errors specific to relay operations.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Relay request not found")]
    NotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for RelayError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for RelayError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Incoming submission payload.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRelayRequest {
    pub bot_token: String,
    pub chat_id: String,
    pub message: String,
}

/// Relay request DTO for responses.
#[derive(Debug, Clone, Serialize)]
pub struct RelayRequestInfo {
    pub id: i64,
    pub user_id: i32,
    pub bot_token: String,
    pub chat_id: String,
    pub message: String,
    pub status: DeliveryStatus,
    pub response_status: Option<i32>,
    pub created_at: String,
}

impl From<crate::db::RelayRequest> for RelayRequestInfo {
    fn from(model: crate::db::RelayRequest) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            bot_token: model.bot_token,
            chat_id: model.chat_id,
            message: model.message,
            status: model.status,
            response_status: model.response_status,
            created_at: model.created_at,
        }
    }
}

/// One recorded delivery attempt.
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryLogEntry {
    pub id: i64,
    pub request_id: i64,
    pub outcome: String,
    pub response: String,
    pub created_at: String,
}

impl From<crate::db::DeliveryLog> for DeliveryLogEntry {
    fn from(model: crate::db::DeliveryLog) -> Self {
        Self {
            id: model.id,
            request_id: model.request_id,
            outcome: model.outcome,
            response: model.response,
            created_at: model.created_at,
        }
    }
}

/// Domain service trait for message relaying.
#[async_trait::async_trait]
pub trait RelayService: Send + Sync {
    /// Persists the request, performs the outbound call, and records the
    /// outcome. A failed delivery is a recorded result, not an error.
    async fn submit(
        &self,
        user_id: i32,
        request: NewRelayRequest,
    ) -> Result<RelayRequestInfo, RelayError>;

    async fn list_all(&self) -> Result<Vec<RelayRequestInfo>, RelayError>;

    async fn list_for_user(&self, user_id: i32) -> Result<Vec<RelayRequestInfo>, RelayError>;

    async fn get(&self, id: i64) -> Result<Option<RelayRequestInfo>, RelayError>;

    /// Delivery log rows for one request.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::NotFound`] when the request does not exist.
    async fn delivery_log(&self, request_id: i64) -> Result<Vec<DeliveryLogEntry>, RelayError>;
}
