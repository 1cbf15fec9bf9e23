//! Authorization code exchange.
//!
//! After the merchant approves the install, Shopify redirects back with a
//! single-use `code`. [`TokenExchanger`] trades that code for a permanent
//! access token by POSTing a form-encoded body to
//! `https://{shop}/admin/oauth/access_token`:
//!
//! ```text
//! client_id=...&client_secret=...&code=...
//! ```
//!
//! The outcome is classified into a [`ProviderResponse`] before anything
//! else looks at it:
//!
//! - status 200 with a non-empty `access_token`: granted
//! - status 200 without one, or with an unparseable body: malformed
//! - any other status: rejected, carrying the status and body text
//!
//! The exchange is attempted exactly once. Codes are single-use, so a
//! retry after a partial failure would be rejected anyway.
//!
//! The [`CodeExchanger`] trait lets the callback handler run against a
//! stub in tests.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::auth::oauth::error::OAuthError;
use crate::auth::AuthScopes;
use crate::config::{AppConfig, ShopDomain};

/// Path of Shopify's token endpoint on the shop's host.
pub const ACCESS_TOKEN_PATH: &str = "/admin/oauth/access_token";

/// Form body sent to the token endpoint.
#[derive(Serialize)]
struct AccessTokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
}

/// JSON body of a successful token endpoint response.
///
/// Both fields are optional on the wire; a missing or empty `access_token`
/// is reported as [`OAuthError::MalformedUpstreamResponse`].
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct AccessTokenResponse {
    /// The permanent (offline) access token.
    pub access_token: Option<String>,
    /// Comma-separated scopes actually granted.
    pub scope: Option<String>,
}

/// A classified token endpoint response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProviderResponse {
    /// Status 200 with a JSON body.
    Granted(AccessTokenResponse),
    /// Any non-200 status.
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },
}

impl ProviderResponse {
    /// Classifies a raw status and body.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::MalformedUpstreamResponse`] if a 200 body is not
    /// valid JSON for [`AccessTokenResponse`].
    pub fn classify(status: u16, body: String) -> Result<Self, OAuthError> {
        if status != 200 {
            return Ok(Self::Rejected { status, body });
        }

        serde_json::from_str::<AccessTokenResponse>(&body)
            .map(Self::Granted)
            .map_err(|e| OAuthError::MalformedUpstreamResponse {
                reason: format!("invalid JSON body: {e}"),
            })
    }

    /// Turns the response into a usable grant.
    ///
    /// # Errors
    ///
    /// - [`OAuthError::UpstreamRejected`] for [`ProviderResponse::Rejected`]
    /// - [`OAuthError::MalformedUpstreamResponse`] if the token is missing
    pub fn into_grant(self) -> Result<AccessTokenGrant, OAuthError> {
        match self {
            Self::Rejected { status, body } => Err(OAuthError::UpstreamRejected {
                status,
                message: body,
            }),
            Self::Granted(AccessTokenResponse {
                access_token: None, ..
            }) => Err(OAuthError::MalformedUpstreamResponse {
                reason: "response has no access_token".to_string(),
            }),
            Self::Granted(AccessTokenResponse {
                access_token: Some(token),
                ..
            }) if token.trim().is_empty() => Err(OAuthError::MalformedUpstreamResponse {
                reason: "access_token is empty".to_string(),
            }),
            Self::Granted(AccessTokenResponse {
                access_token: Some(access_token),
                scope,
            }) => {
                let scopes = scope
                    .as_deref()
                    .filter(|s| !s.trim().is_empty())
                    .and_then(|s| match s.parse::<AuthScopes>() {
                        Ok(scopes) => Some(scopes),
                        Err(e) => {
                            tracing::warn!(scope = s, error = %e, "ignoring unparseable granted scope");
                            None
                        }
                    });

                Ok(AccessTokenGrant {
                    access_token,
                    scopes,
                })
            }
        }
    }
}

/// The result of a successful code exchange.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessTokenGrant {
    /// The access token. Never empty.
    pub access_token: String,
    /// Scopes Shopify reported as granted, if any.
    pub scopes: Option<AuthScopes>,
}

impl fmt::Debug for AccessTokenGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessTokenGrant")
            .field("access_token", &"[REDACTED]")
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// Exchanges an authorization code for an access token.
#[async_trait]
pub trait CodeExchanger: Send + Sync + fmt::Debug {
    /// Performs one exchange attempt for `code` against `shop`.
    async fn exchange(&self, shop: &ShopDomain, code: &str) -> Result<AccessTokenGrant, OAuthError>;
}

/// [`CodeExchanger`] that talks to Shopify over HTTPS.
#[derive(Clone, Debug)]
pub struct TokenExchanger {
    config: Arc<AppConfig>,
    client: reqwest::Client,
}

impl TokenExchanger {
    /// Creates an exchanger with a fresh HTTP client.
    #[must_use]
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    /// Creates an exchanger sharing an existing HTTP client.
    #[must_use]
    pub const fn with_client(config: Arc<AppConfig>, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    /// Returns the token endpoint URL for `shop`.
    #[must_use]
    pub fn token_url(&self, shop: &ShopDomain) -> String {
        format!("{}{ACCESS_TOKEN_PATH}", self.config.provider_origin(shop))
    }
}

#[async_trait]
impl CodeExchanger for TokenExchanger {
    async fn exchange(
        &self,
        shop: &ShopDomain,
        code: &str,
    ) -> Result<AccessTokenGrant, OAuthError> {
        let body = AccessTokenRequest {
            client_id: self.config.api_key().as_ref(),
            client_secret: self.config.api_secret_key().as_ref(),
            code,
        };

        let response = self
            .client
            .post(self.token_url(shop))
            .form(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(shop = %shop, error = %e, "token endpoint unreachable");
                OAuthError::Transport(e)
            })?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| {
            tracing::error!(shop = %shop, error = %e, "failed to read token endpoint response");
            OAuthError::Transport(e)
        })?;

        let classified =
            ProviderResponse::classify(status, text).and_then(ProviderResponse::into_grant);
        match &classified {
            Err(OAuthError::UpstreamRejected { status, message }) => {
                tracing::warn!(shop = %shop, status, body = %message, "token exchange rejected");
            }
            Err(e) => {
                tracing::error!(shop = %shop, error = %e, "token exchange returned malformed response");
            }
            Ok(_) => tracing::debug!(shop = %shop, "token exchange succeeded"),
        }

        classified
    }
}

// Verify exchange types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TokenExchanger>();
    assert_send_sync::<ProviderResponse>();
};
