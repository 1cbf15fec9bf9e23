//! Configuration types for the install service.
//!
//! # Overview
//!
//! - [`AppConfig`]: the OAuth application settings shared by every request
//! - [`AppConfigBuilder`]: a builder for constructing [`AppConfig`] instances
//! - [`ServerConfig`]: listener and storage settings for the binary
//! - [`ApiKey`], [`ApiSecretKey`], [`ShopDomain`], [`RedirectUri`],
//!   [`ApiVersion`]: validated newtypes
//!
//! Configuration is constructed once and passed into each component
//! explicitly; nothing is read from the environment after startup.
//!
//! # Example
//!
//! ```rust
//! use shopify_connect::{AppConfig, ApiKey, ApiSecretKey, RedirectUri};
//!
//! let config = AppConfig::builder()
//!     .api_key(ApiKey::new("my-api-key").unwrap())
//!     .api_secret_key(ApiSecretKey::new("my-secret").unwrap())
//!     .redirect_uri(RedirectUri::new("https://myapp.example.com/callback").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.scopes().to_string(), "read_orders");
//! ```

mod env;
mod newtypes;
mod version;

pub use env::ServerConfig;
pub use newtypes::{ApiKey, ApiSecretKey, RedirectUri, ShopDomain};
pub use version::ApiVersion;

use crate::auth::AuthScopes;
use crate::error::ConfigError;

/// Scopes requested when none are configured.
pub const DEFAULT_SCOPES: &str = "read_orders";

/// Where merchants land after a successful install, unless overridden.
pub const DEFAULT_LANDING_URL: &str = "/installed";

/// OAuth application configuration.
///
/// `AppConfig` is `Clone`, `Send`, and `Sync`; the server keeps one copy
/// behind an `Arc` and hands references to each component.
#[derive(Clone, Debug)]
pub struct AppConfig {
    api_key: ApiKey,
    api_secret_key: ApiSecretKey,
    scopes: AuthScopes,
    redirect_uri: RedirectUri,
    api_version: ApiVersion,
    landing_url: String,
    provider_base_url: Option<String>,
}

impl AppConfig {
    /// Creates a new builder for constructing an `AppConfig`.
    #[must_use]
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::new()
    }

    /// Returns the API key, sent as `client_id`.
    #[must_use]
    pub const fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Returns the API secret key, sent as `client_secret`.
    #[must_use]
    pub const fn api_secret_key(&self) -> &ApiSecretKey {
        &self.api_secret_key
    }

    /// Returns the OAuth scopes requested during authorization.
    #[must_use]
    pub const fn scopes(&self) -> &AuthScopes {
        &self.scopes
    }

    /// Returns the redirect URI Shopify sends the merchant back to.
    #[must_use]
    pub const fn redirect_uri(&self) -> &RedirectUri {
        &self.redirect_uri
    }

    /// Returns the Admin API version used for store-info calls.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Returns the URL merchants are redirected to after a persisted install.
    #[must_use]
    pub fn landing_url(&self) -> &str {
        &self.landing_url
    }

    /// Returns the origin used for outbound calls to the given shop.
    ///
    /// This is `https://{shop}` unless a provider base URL override is set.
    #[must_use]
    pub fn provider_origin(&self, shop: &ShopDomain) -> String {
        self.provider_base_url.as_ref().map_or_else(
            || format!("https://{}", shop.as_ref()),
            |base| base.trim_end_matches('/').to_string(),
        )
    }
}

// Verify AppConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AppConfig>();
};

/// Builder for constructing [`AppConfig`] instances.
///
/// Required fields are `api_key`, `api_secret_key` and `redirect_uri`.
///
/// # Defaults
///
/// - `scopes`: `read_orders`
/// - `api_version`: `2025-10`
/// - `landing_url`: `/installed`
/// - `provider_base_url`: `None` (calls go to `https://{shop}`)
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    api_key: Option<ApiKey>,
    api_secret_key: Option<ApiSecretKey>,
    scopes: Option<AuthScopes>,
    redirect_uri: Option<RedirectUri>,
    api_version: Option<ApiVersion>,
    landing_url: Option<String>,
    provider_base_url: Option<String>,
}

impl AppConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: ApiKey) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Sets the API secret key (required).
    #[must_use]
    pub fn api_secret_key(mut self, key: ApiSecretKey) -> Self {
        self.api_secret_key = Some(key);
        self
    }

    /// Sets the redirect URI (required).
    #[must_use]
    pub fn redirect_uri(mut self, uri: RedirectUri) -> Self {
        self.redirect_uri = Some(uri);
        self
    }

    /// Sets the OAuth scopes.
    #[must_use]
    pub fn scopes(mut self, scopes: AuthScopes) -> Self {
        self.scopes = Some(scopes);
        self
    }

    /// Sets the Admin API version.
    #[must_use]
    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Sets the landing URL used after a successful install.
    #[must_use]
    pub fn landing_url(mut self, url: impl Into<String>) -> Self {
        self.landing_url = Some(url.into());
        self
    }

    /// Overrides the `https://{shop}` origin for outbound provider calls.
    ///
    /// Used to point the token exchange and store-info calls at a local
    /// proxy or a mock server. The authorization redirect always targets
    /// the shop itself.
    #[must_use]
    pub fn provider_base_url(mut self, url: impl Into<String>) -> Self {
        self.provider_base_url = Some(url.into());
        self
    }

    /// Builds the [`AppConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `api_key`,
    /// `api_secret_key` or `redirect_uri` are not set.
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let api_key = self
            .api_key
            .ok_or(ConfigError::MissingRequiredField { field: "api_key" })?;
        let api_secret_key = self
            .api_secret_key
            .ok_or(ConfigError::MissingRequiredField {
                field: "api_secret_key",
            })?;
        let redirect_uri = self
            .redirect_uri
            .ok_or(ConfigError::MissingRequiredField {
                field: "redirect_uri",
            })?;

        let scopes = match self.scopes {
            Some(scopes) if !scopes.is_empty() => scopes,
            _ => DEFAULT_SCOPES.parse()?,
        };

        Ok(AppConfig {
            api_key,
            api_secret_key,
            scopes,
            redirect_uri,
            api_version: self.api_version.unwrap_or_default(),
            landing_url: self
                .landing_url
                .unwrap_or_else(|| DEFAULT_LANDING_URL.to_string()),
            provider_base_url: self.provider_base_url,
        })
    }
}
