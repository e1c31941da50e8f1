use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use crate::entities::delivery_logs::Model as DeliveryLog;
pub use crate::entities::relay_requests::Model as RelayRequest;
pub use repositories::user::User;

use crate::config::AuthConfig;
use crate::entities::relay_requests::DeliveryStatus;
use crate::entities::users::Role;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let is_memory = db_url.contains(":memory:");

        if !is_memory {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        // An in-memory database only exists on a single connection, so the
        // pool must not hand out more than one.
        let (max_connections, min_connections) = if is_memory {
            (1, 1)
        } else {
            (max_connections, min_connections)
        };

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn request_repo(&self) -> repositories::request::RequestRepository {
        repositories::request::RequestRepository::new(self.conn.clone())
    }

    fn logs_repo(&self) -> repositories::logs::LogRepository {
        repositories::logs::LogRepository::new(self.conn.clone())
    }

    // ========== Users ==========

    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        role: Role,
        config: &AuthConfig,
    ) -> Result<User> {
        self.user_repo()
            .create(username, password, role, config)
            .await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user_repo().list().await
    }

    pub async fn count_users(&self) -> Result<u64> {
        self.user_repo().count().await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(username, password).await
    }

    pub async fn update_user_password(
        &self,
        username: &str,
        new_password: &str,
        config: &AuthConfig,
    ) -> Result<()> {
        self.user_repo()
            .update_password(username, new_password, config)
            .await
    }

    // ========== Relay requests ==========

    pub async fn create_request(
        &self,
        user_id: i32,
        bot_token: &str,
        chat_id: &str,
        message: &str,
    ) -> Result<RelayRequest> {
        self.request_repo()
            .create(user_id, bot_token, chat_id, message)
            .await
    }

    pub async fn finalize_request(
        &self,
        id: i64,
        status: DeliveryStatus,
        response_status: Option<i32>,
    ) -> Result<RelayRequest> {
        self.request_repo()
            .finalize(id, status, response_status)
            .await
    }

    pub async fn get_request(&self, id: i64) -> Result<Option<RelayRequest>> {
        self.request_repo().get(id).await
    }

    pub async fn list_requests(&self) -> Result<Vec<RelayRequest>> {
        self.request_repo().list_all().await
    }

    pub async fn list_requests_for_user(&self, user_id: i32) -> Result<Vec<RelayRequest>> {
        self.request_repo().list_for_user(user_id).await
    }

    pub async fn count_requests(&self) -> Result<u64> {
        self.request_repo().count().await
    }

    pub async fn count_requests_with_status(&self, status: DeliveryStatus) -> Result<u64> {
        self.request_repo().count_with_status(status).await
    }

    // ========== Delivery log ==========

    pub async fn add_delivery_log(
        &self,
        request_id: i64,
        outcome: &str,
        response: String,
    ) -> Result<()> {
        self.logs_repo().add(request_id, outcome, response).await
    }

    pub async fn get_delivery_logs_for_request(
        &self,
        request_id: i64,
    ) -> Result<Vec<DeliveryLog>> {
        self.logs_repo().get_for_request(request_id).await
    }

    pub async fn get_delivery_logs(
        &self,
        page: u64,
        page_size: u64,
        outcome_filter: Option<String>,
    ) -> Result<(Vec<DeliveryLog>, u64)> {
        self.logs_repo()
            .get_logs(page, page_size, outcome_filter)
            .await
    }

    pub async fn clear_delivery_logs(&self) -> Result<u64> {
        self.logs_repo().clear().await
    }

    pub async fn prune_delivery_logs(&self, older_than_days: i64) -> Result<u64> {
        self.logs_repo().prune(older_than_days).await
    }
}
