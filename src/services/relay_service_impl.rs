//! `SeaORM` implementation of the `RelayService` trait.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::clients::telegram::TelegramClient;
use crate::db::Store;
use crate::entities::relay_requests::DeliveryStatus;
use crate::services::relay_service::{
    DeliveryLogEntry, NewRelayRequest, RelayError, RelayRequestInfo, RelayService,
};

pub struct SeaOrmRelayService {
    store: Store,
    telegram: Arc<TelegramClient>,
}

impl SeaOrmRelayService {
    #[must_use]
    pub const fn new(store: Store, telegram: Arc<TelegramClient>) -> Self {
        Self { store, telegram }
    }
}

fn validate(request: &NewRelayRequest) -> Result<(), RelayError> {
    if request.bot_token.trim().is_empty() {
        return Err(RelayError::Validation("bot_token is required".to_string()));
    }
    if request.chat_id.trim().is_empty() {
        return Err(RelayError::Validation("chat_id is required".to_string()));
    }
    if request.message.trim().is_empty() {
        return Err(RelayError::Validation("message is required".to_string()));
    }
    Ok(())
}

#[async_trait]
impl RelayService for SeaOrmRelayService {
    async fn submit(
        &self,
        user_id: i32,
        request: NewRelayRequest,
    ) -> Result<RelayRequestInfo, RelayError> {
        validate(&request)?;

        let row = self
            .store
            .create_request(user_id, &request.bot_token, &request.chat_id, &request.message)
            .await?;

        let (status, response_status, response_body) = match self
            .telegram
            .send_message(&request.bot_token, &request.chat_id, &request.message)
            .await
        {
            Ok(outcome) => {
                let status = if outcome.ok {
                    DeliveryStatus::Delivered
                } else {
                    DeliveryStatus::Failed
                };
                (status, Some(i32::from(outcome.http_status)), outcome.body)
            }
            Err(e) => {
                warn!(request_id = row.id, error = %e, "Relay transport failure");
                (DeliveryStatus::Failed, None, e.to_string())
            }
        };

        self.store
            .add_delivery_log(row.id, status.as_str(), response_body)
            .await?;

        let finalized = self
            .store
            .finalize_request(row.id, status, response_status)
            .await?;

        info!(
            request_id = finalized.id,
            status = status.as_str(),
            "Relay request processed"
        );

        Ok(RelayRequestInfo::from(finalized))
    }

    async fn list_all(&self) -> Result<Vec<RelayRequestInfo>, RelayError> {
        let rows = self.store.list_requests().await?;
        Ok(rows.into_iter().map(RelayRequestInfo::from).collect())
    }

    async fn list_for_user(&self, user_id: i32) -> Result<Vec<RelayRequestInfo>, RelayError> {
        let rows = self.store.list_requests_for_user(user_id).await?;
        Ok(rows.into_iter().map(RelayRequestInfo::from).collect())
    }

    async fn get(&self, id: i64) -> Result<Option<RelayRequestInfo>, RelayError> {
        let row = self.store.get_request(id).await?;
        Ok(row.map(RelayRequestInfo::from))
    }

    async fn delivery_log(&self, request_id: i64) -> Result<Vec<DeliveryLogEntry>, RelayError> {
        if self.store.get_request(request_id).await?.is_none() {
            return Err(RelayError::NotFound);
        }

        let rows = self.store.get_delivery_logs_for_request(request_id).await?;
        Ok(rows.into_iter().map(DeliveryLogEntry::from).collect())
    }
}
