use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::relay_requests::{self, DeliveryStatus};

pub struct RequestRepository {
    conn: DatabaseConnection,
}

impl RequestRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Persist a new request in the `pending` state.
    pub async fn create(
        &self,
        user_id: i32,
        bot_token: &str,
        chat_id: &str,
        message: &str,
    ) -> Result<relay_requests::Model> {
        let active = relay_requests::ActiveModel {
            user_id: Set(user_id),
            bot_token: Set(bot_token.to_string()),
            chat_id: Set(chat_id.to_string()),
            message: Set(message.to_string()),
            status: Set(DeliveryStatus::Pending),
            response_status: Set(None),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert relay request")
    }

    /// Record the delivery outcome. The message payload itself never changes.
    pub async fn finalize(
        &self,
        id: i64,
        status: DeliveryStatus,
        response_status: Option<i32>,
    ) -> Result<relay_requests::Model> {
        let request = relay_requests::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query relay request for finalization")?
            .ok_or_else(|| anyhow::anyhow!("Relay request not found: {id}"))?;

        let mut active: relay_requests::ActiveModel = request.into();
        active.status = Set(status);
        active.response_status = Set(response_status);

        active
            .update(&self.conn)
            .await
            .context("Failed to record delivery outcome")
    }

    pub async fn get(&self, id: i64) -> Result<Option<relay_requests::Model>> {
        relay_requests::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query relay request")
    }

    pub async fn list_all(&self) -> Result<Vec<relay_requests::Model>> {
        relay_requests::Entity::find()
            .order_by_desc(relay_requests::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list relay requests")
    }

    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<relay_requests::Model>> {
        relay_requests::Entity::find()
            .filter(relay_requests::Column::UserId.eq(user_id))
            .order_by_desc(relay_requests::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list relay requests for user")
    }

    pub async fn count(&self) -> Result<u64> {
        relay_requests::Entity::find()
            .count(&self.conn)
            .await
            .context("Failed to count relay requests")
    }

    pub async fn count_with_status(&self, status: DeliveryStatus) -> Result<u64> {
        relay_requests::Entity::find()
            .filter(relay_requests::Column::Status.eq(status))
            .count(&self.conn)
            .await
            .context("Failed to count relay requests by status")
    }
}
