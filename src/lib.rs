pub mod api;
pub mod clients;
pub mod config;
pub mod db;
pub mod entities;
pub mod services;

use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

pub use config::Config;

use db::migrator::{DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME};

pub async fn run() -> anyhow::Result<()> {
    // Load .env if present so RUST_LOG and friends are picked up.
    let _ = dotenvy::dotenv();

    let config = Config::load()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        None => {
            config.validate()?;
            serve(config).await
        }

        Some("init" | "--init") => {
            if Config::create_default_if_missing()? {
                println!("✓ Config file created. Edit config.toml and run again.");
            } else {
                println!("config.toml already exists.");
            }
            Ok(())
        }

        Some("help" | "-h" | "--help") => {
            print_help();
            Ok(())
        }

        Some(other) => {
            println!("Unknown command: {other}");
            println!();
            print_help();
            Ok(())
        }
    }
}

fn print_help() {
    println!("Courier - Message Relay Gateway");
    println!("HTTP API that stores JSON message requests and relays them to the Telegram Bot API");
    println!();
    println!("USAGE:");
    println!("  courier [COMMAND]");
    println!();
    println!("COMMANDS:");
    println!("  (none)            Start the HTTP server");
    println!("  init              Create default config file");
    println!("  help              Show this help message");
    println!();
    println!("CONFIG:");
    println!("  Edit config.toml to configure the server, auth, and Telegram access.");
}

async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Courier v{} starting...", env!("CARGO_PKG_VERSION"));

    let state = api::create_app_state_from_config(config.clone()).await?;

    let bootstrap_active = state
        .store
        .verify_user_password(DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD)
        .await
        .unwrap_or(false);
    if bootstrap_active {
        warn!(
            "Default admin credentials are still active; change them via PUT /api/users/password"
        );
    }

    let app = api::router(state);
    let addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    let server_handle = tokio::spawn(async move {
        info!("🌐 Web Server running at http://{}", addr);
        if let Err(e) = axum::serve(listener, app).await {
            error!("Web server error: {}", e);
        }
    });

    info!("Server running. Press Ctrl+C to stop.");

    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received");
        }
        Err(e) => {
            error!("Error listening for shutdown: {}", e);
        }
    }

    server_handle.abort();
    info!("Server stopped");

    Ok(())
}
