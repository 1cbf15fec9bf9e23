//! OAuth callback handling.
//!
//! Shopify redirects the merchant to the app's redirect URI with `code` and
//! `shop` in the query string (plus `hmac`, `timestamp` and friends).
//! [`CallbackHandler::handle`] drives one callback through
//!
//! ```text
//! Received ──▶ Exchanging ──▶ Persisted
//!    │             │
//!    └─────────────┴──────▶ Failed
//! ```
//!
//! and only reports success once the token is in the
//! [`CredentialStore`]. A callback that fails validation never reaches the
//! exchanger; a rejected exchange never reaches the store.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::auth::oauth::error::OAuthError;
use crate::auth::oauth::hmac::validate_hmac;
use crate::auth::oauth::token_exchange::CodeExchanger;
use crate::auth::StoreCredential;
use crate::config::{AppConfig, ShopDomain};
use crate::store::CredentialStore;

/// Query parameters received on the callback.
///
/// Every parameter is retained so the signature can be recomputed.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct CallbackQuery {
    params: BTreeMap<String, String>,
}

impl CallbackQuery {
    /// Builds a query from key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            params: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns a parameter by name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Returns the authorization code, if present.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.get("code")
    }

    /// Returns the raw shop parameter, if present.
    #[must_use]
    pub fn shop(&self) -> Option<&str> {
        self.get("shop")
    }

    /// Returns all parameters.
    #[must_use]
    pub const fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }
}

/// Where a callback is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallbackState {
    /// Parameters received, not yet validated.
    Received,
    /// Parameters valid; code exchange in flight.
    Exchanging,
    /// Token stored.
    Persisted,
    /// Validation, exchange, or storage failed.
    Failed,
}

impl fmt::Display for CallbackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Received => "received",
            Self::Exchanging => "exchanging",
            Self::Persisted => "persisted",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A callback whose parameters passed validation.
struct ValidatedCallback<'a> {
    shop: ShopDomain,
    code: &'a str,
}

/// Handles the OAuth callback: validate, exchange, persist.
///
/// Cheap to clone; the exchanger and store are shared.
#[derive(Clone, Debug)]
pub struct CallbackHandler {
    config: Arc<AppConfig>,
    exchanger: Arc<dyn CodeExchanger>,
    store: Arc<dyn CredentialStore>,
}

impl CallbackHandler {
    /// Creates a handler over the given exchanger and store.
    #[must_use]
    pub fn new(
        config: Arc<AppConfig>,
        exchanger: Arc<dyn CodeExchanger>,
        store: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            config,
            exchanger,
            store,
        }
    }

    /// Processes one callback.
    ///
    /// On success the returned credential has already been written to the
    /// store, replacing any earlier credential for the same shop.
    ///
    /// # Errors
    ///
    /// - [`OAuthError::InvalidCallback`] if `code` or `shop` is missing,
    ///   blank, or the shop is not a `myshopify.com` domain
    /// - [`OAuthError::InvalidHmac`] if an `hmac` parameter is present and
    ///   does not verify
    /// - any error from the exchanger
    /// - [`OAuthError::StorageFailure`] if the token could not be stored
    pub async fn handle(&self, query: &CallbackQuery) -> Result<StoreCredential, OAuthError> {
        let mut state = CallbackState::Received;

        let result = self.run(query, &mut state).await;
        if let Err(e) = &result {
            tracing::debug!(from = %state, error = %e, "callback failed");
            state = CallbackState::Failed;
        }
        tracing::debug!(state = %state, "callback finished");

        result
    }

    async fn run(
        &self,
        query: &CallbackQuery,
        state: &mut CallbackState,
    ) -> Result<StoreCredential, OAuthError> {
        let callback = self.validate(query)?;

        *state = CallbackState::Exchanging;
        let grant = self
            .exchanger
            .exchange(&callback.shop, callback.code)
            .await?;

        let credential =
            StoreCredential::new(callback.shop, grant.access_token).with_scopes(grant.scopes);

        self.store
            .upsert(credential.clone())
            .await
            .map_err(|e| {
                tracing::error!(shop = %credential.shop, error = %e, "failed to persist access token");
                OAuthError::StorageFailure(e)
            })?;

        *state = CallbackState::Persisted;
        tracing::info!(shop = %credential.shop, "access token stored");

        Ok(credential)
    }

    fn validate<'a>(&self, query: &'a CallbackQuery) -> Result<ValidatedCallback<'a>, OAuthError> {
        let code = non_blank(query.code()).ok_or_else(|| OAuthError::InvalidCallback {
            reason: "Missing 'code' parameter".to_string(),
        })?;
        let raw_shop = non_blank(query.shop()).ok_or_else(|| OAuthError::InvalidCallback {
            reason: "Missing 'shop' parameter".to_string(),
        })?;

        if query.get("hmac").is_some()
            && !validate_hmac(query.params(), self.config.api_secret_key().as_ref())
        {
            tracing::warn!(shop = raw_shop, "callback HMAC did not verify");
            return Err(OAuthError::InvalidHmac);
        }

        let shop = ShopDomain::new(raw_shop).map_err(|e| OAuthError::InvalidCallback {
            reason: e.to_string(),
        })?;

        Ok(ValidatedCallback { shop, code })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
