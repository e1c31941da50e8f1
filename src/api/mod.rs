use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::clients::telegram::TelegramClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{AuthService, RelayService, SeaOrmAuthService, SeaOrmRelayService};

pub mod auth;
mod error;
pub mod requests;
pub mod system;
mod types;
pub mod users;

pub use error::ApiError;
pub use types::*;

pub struct AppState {
    pub config: Config,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub relay_service: Arc<dyn RelayService>,

    pub start_time: std::time::Instant,
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    let telegram = Arc::new(
        TelegramClient::new(&config.telegram)
            .map_err(|e| anyhow::anyhow!("Failed to build Telegram client: {e}"))?,
    );

    let auth_service = Arc::new(SeaOrmAuthService::new(store.clone(), config.auth.clone()))
        as Arc<dyn AuthService>;

    let relay_service =
        Arc::new(SeaOrmRelayService::new(store.clone(), telegram)) as Arc<dyn RelayService>;

    Ok(Arc::new(AppState {
        config,
        store,
        auth_service,
        relay_service,
        start_time: std::time::Instant::now(),
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config.server.cors_allowed_origins.clone();

    let auth_layer = middleware::from_fn_with_state(state.clone(), auth::auth_middleware);

    let protected_routes = Router::new()
        .route("/users/me", get(users::me))
        .route("/users/password", put(users::change_password))
        .route("/requests", get(requests::list_requests))
        .route("/requests", post(requests::create_request))
        .route("/requests/{id}", get(requests::get_request))
        .route("/requests/{id}/log", get(requests::get_request_log))
        .route("/system/status", get(system::get_status))
        .route("/system/logs", get(system::get_logs))
        .route("/system/logs", delete(system::clear_logs))
        .route_layer(auth_layer.clone());

    let api_router = Router::new()
        .merge(protected_routes)
        // Signup is the one public method on a path whose other methods are
        // protected, so the auth layer is attached per-method here.
        .route(
            "/users",
            get(users::list_users)
                .route_layer(auth_layer)
                .post(users::signup),
        )
        .route("/token", post(auth::login));

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .route("/health", get(system::health))
        .nest("/api", api_router)
        .with_state(state)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
