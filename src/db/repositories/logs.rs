use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{delivery_logs, prelude::*};

pub struct LogRepository {
    conn: DatabaseConnection,
}

impl LogRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn add(&self, request_id: i64, outcome: &str, response: String) -> Result<()> {
        let active_model = delivery_logs::ActiveModel {
            request_id: Set(request_id),
            outcome: Set(outcome.to_string()),
            response: Set(response),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        DeliveryLogs::insert(active_model)
            .exec(&self.conn)
            .await
            .context("Failed to insert delivery log")?;
        Ok(())
    }

    pub async fn get_for_request(&self, request_id: i64) -> Result<Vec<delivery_logs::Model>> {
        DeliveryLogs::find()
            .filter(delivery_logs::Column::RequestId.eq(request_id))
            .order_by_asc(delivery_logs::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query delivery logs for request")
    }

    pub async fn get_logs(
        &self,
        page: u64,
        page_size: u64,
        outcome_filter: Option<String>,
    ) -> Result<(Vec<delivery_logs::Model>, u64)> {
        let mut query = DeliveryLogs::find().order_by_desc(delivery_logs::Column::Id);

        if let Some(outcome) = outcome_filter {
            query = query.filter(delivery_logs::Column::Outcome.eq(outcome));
        }

        let paginator = query.paginate(&self.conn, page_size.max(1));
        let total_pages = paginator.num_pages().await?;
        let items = paginator.fetch_page(page.max(1) - 1).await?;

        Ok((items, total_pages))
    }

    pub async fn clear(&self) -> Result<u64> {
        let result = DeliveryLogs::delete_many().exec(&self.conn).await?;
        Ok(result.rows_affected)
    }

    pub async fn prune(&self, older_than_days: i64) -> Result<u64> {
        let cutoff = (chrono::Utc::now() - chrono::Duration::days(older_than_days)).to_rfc3339();

        let result = DeliveryLogs::delete_many()
            .filter(delivery_logs::Column::CreatedAt.lt(cutoff))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected)
    }
}
