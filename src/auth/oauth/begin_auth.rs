//! OAuth authorization URL generation.
//!
//! [`begin_auth`] is the first step of the install flow: it turns the shop
//! the merchant typed into an [`AuthorizationRequest`] whose URL the
//! browser is redirected to. No network call is made.
//!
//! # Example
//!
//! ```rust
//! use shopify_connect::{AppConfig, ApiKey, ApiSecretKey, RedirectUri};
//! use shopify_connect::auth::oauth::begin_auth;
//!
//! let config = AppConfig::builder()
//!     .api_key(ApiKey::new("api-key").unwrap())
//!     .api_secret_key(ApiSecretKey::new("secret").unwrap())
//!     .redirect_uri(RedirectUri::new("https://myapp.example.com/callback").unwrap())
//!     .build()
//!     .unwrap();
//!
//! let request = begin_auth(&config, Some("test-shop")).unwrap();
//! assert!(request
//!     .url()
//!     .starts_with("https://test-shop.myshopify.com/admin/oauth/authorize?client_id=api-key"));
//! ```

use crate::auth::oauth::error::OAuthError;
use crate::auth::AuthScopes;
use crate::config::{AppConfig, ShopDomain};

/// Path of Shopify's authorization endpoint on the shop's host.
pub const AUTHORIZE_PATH: &str = "/admin/oauth/authorize";

/// An authorization request for one shop.
///
/// Built by [`begin_auth`] and consumed immediately by the redirect; it is
/// never stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationRequest {
    /// The normalized shop the merchant is installing into.
    pub shop: ShopDomain,
    /// The app's client id.
    pub client_id: String,
    /// Scopes requested from the merchant.
    pub scopes: AuthScopes,
    /// Where Shopify sends the merchant back to.
    pub redirect_uri: String,
}

impl AuthorizationRequest {
    /// Renders the authorization URL.
    ///
    /// Query values are percent-encoded.
    #[must_use]
    pub fn url(&self) -> String {
        let params = [
            ("client_id", self.client_id.clone()),
            ("scope", self.scopes.to_string()),
            ("redirect_uri", self.redirect_uri.clone()),
        ];

        let query_string = params
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!(
            "https://{}{AUTHORIZE_PATH}?{query_string}",
            self.shop.as_ref()
        )
    }
}

/// Builds the authorization request for the shop the merchant supplied.
///
/// The shop is normalized with [`ShopDomain::new`], so `"my-store"` and
/// `"my-store.myshopify.com"` produce the same request.
///
/// # Errors
///
/// Returns [`OAuthError::InvalidRequest`] if `shop` is `None`, blank, or
/// not a valid `myshopify.com` shop. An empty host is never embedded in a
/// URL.
pub fn begin_auth(
    config: &AppConfig,
    shop: Option<&str>,
) -> Result<AuthorizationRequest, OAuthError> {
    let raw = shop
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| OAuthError::InvalidRequest {
            reason: "Missing 'shop' parameter".to_string(),
        })?;

    let shop = ShopDomain::new(raw).map_err(|e| OAuthError::InvalidRequest {
        reason: e.to_string(),
    })?;

    tracing::debug!(shop = %shop, "building authorization request");

    Ok(AuthorizationRequest {
        shop,
        client_id: config.api_key().as_ref().to_string(),
        scopes: config.scopes().clone(),
        redirect_uri: config.redirect_uri().as_ref().to_string(),
    })
}

// Verify AuthorizationRequest is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AuthorizationRequest>();
};
