//! # Shopify Connect
//!
//! The server side of a Shopify app install: send the merchant to Shopify's
//! authorization page, exchange the returned code for a permanent access
//! token, and keep one token per shop for later Admin API calls.
//!
//! ## Overview
//!
//! - Type-safe configuration via [`AppConfig`] and [`AppConfigBuilder`],
//!   or from the environment with [`AppConfig::from_env`]
//! - Validated newtypes for credentials and shop domains
//! - The authorization code flow in [`auth::oauth`]
//! - Per-shop token storage behind the [`store::CredentialStore`] trait,
//!   in memory or in SQLite
//! - An axum router exposing the install routes in [`server`]
//!
//! ## Quick Start
//!
//! ```rust
//! use shopify_connect::{AppConfig, ApiKey, ApiSecretKey, RedirectUri};
//! use shopify_connect::auth::oauth::begin_auth;
//!
//! let config = AppConfig::builder()
//!     .api_key(ApiKey::new("your-client-id").unwrap())
//!     .api_secret_key(ApiSecretKey::new("your-client-secret").unwrap())
//!     .redirect_uri(RedirectUri::new("https://your-app.com/callback").unwrap())
//!     .scopes("read_orders".parse().unwrap())
//!     .build()
//!     .unwrap();
//!
//! let request = begin_auth(&config, Some("example-shop")).unwrap();
//! assert_eq!(request.shop.as_ref(), "example-shop.myshopify.com");
//! ```
//!
//! ## Serving the Install Flow
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use shopify_connect::{server, AppConfig, store::SqliteCredentialStore};
//!
//! let config = AppConfig::from_env()?;
//! let store = SqliteCredentialStore::connect("sqlite://shop_credentials.db").await?;
//! let app = server::router(server::AppState::new(config, Arc::new(store)));
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! axum::serve(listener, app).await?;
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: configuration, exchanger and store are passed in
//! - **Fail-fast validation**: newtypes reject bad values at construction
//! - **Persist before success**: the callback only redirects to the landing
//!   page once the token is stored
//! - **Thread-safe**: all public types are `Send + Sync`

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod server;
pub mod store;

// Re-export public types at crate root for convenience
pub use auth::{AuthScopes, StoreCredential};
pub use config::{
    ApiKey, ApiSecretKey, ApiVersion, AppConfig, AppConfigBuilder, RedirectUri, ServerConfig,
    ShopDomain,
};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{AdminClient, HttpError, HttpResponseError};

// Re-export OAuth types for convenience
pub use auth::oauth::{
    begin_auth, AuthorizationRequest, CallbackHandler, CallbackQuery, CodeExchanger, OAuthError,
    TokenExchanger,
};

pub use store::{CredentialStore, InMemoryCredentialStore, SqliteCredentialStore, StoreError};
