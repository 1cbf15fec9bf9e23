//! Install service binary.
//!
//! Serves the OAuth install flow on `HOST:PORT` (default `0.0.0.0:8000`)
//! and stores tokens in the SQLite database at `DATABASE_URL`.
//!
//! # Environment
//!
//! - `CLIENT_ID`, `CLIENT_SECRET`, `REDIRECT_URI` (required)
//! - `SCOPES`, `SHOPIFY_API_VERSION`, `LANDING_URL` (optional)
//! - `HOST`, `PORT`, `DATABASE_URL` (optional)
//! - `RUST_LOG` (optional, `tracing` filter)
//!
//! Variables may also come from a `.env` file in the working directory.

use std::sync::Arc;

use secrecy::ExposeSecret;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shopify_connect::server::{self, AppState};
use shopify_connect::{AppConfig, ServerConfig, SqliteCredentialStore};

const DEFAULT_LOG_FILTER: &str = "shopify_connect=info,tower_http=debug";

#[tokio::main]
async fn main() {
    // Load .env before anything reads the environment
    let _ = dotenvy::dotenv();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().expect("Failed to load app configuration");
    let server_config = ServerConfig::from_env().expect("Failed to load server configuration");

    let store = SqliteCredentialStore::connect(server_config.database_url.expose_secret())
        .await
        .expect("Failed to open credential store");

    let state = AppState::new(config, Arc::new(store.clone()));
    let app = server::router(state);

    let addr = server_config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    tracing::info!(%addr, "install service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    store.close().await;
    tracing::info!("shut down");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
