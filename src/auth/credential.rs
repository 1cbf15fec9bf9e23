//! The persisted result of a successful install.

use crate::auth::AuthScopes;
use crate::config::ShopDomain;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// An access token issued for one shop.
///
/// There is at most one live credential per shop; a newer credential for
/// the same shop replaces the older one in the
/// [`CredentialStore`](crate::store::CredentialStore).
///
/// Implements `Debug` manually to redact the access token.
///
/// # Example
///
/// ```rust
/// use shopify_connect::{ShopDomain, StoreCredential};
///
/// let credential = StoreCredential::new(ShopDomain::new("my-store").unwrap(), "shpat_123");
/// assert_eq!(credential.access_token(), "shpat_123");
/// assert!(!format!("{credential:?}").contains("shpat_123"));
/// ```
#[derive(Clone)]
pub struct StoreCredential {
    /// The shop this token belongs to.
    pub shop: ShopDomain,

    /// Scopes reported by the provider alongside the token, if any.
    pub scopes: Option<AuthScopes>,

    /// When this credential was last written.
    pub updated_at: DateTime<Utc>,

    access_token: SecretString,
}

impl StoreCredential {
    /// Creates a credential stamped with the current time.
    #[must_use]
    pub fn new(shop: ShopDomain, access_token: impl Into<String>) -> Self {
        Self {
            shop,
            scopes: None,
            updated_at: Utc::now(),
            access_token: SecretString::from(access_token.into()),
        }
    }

    /// Attaches the granted scopes.
    #[must_use]
    pub fn with_scopes(mut self, scopes: Option<AuthScopes>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Overrides the write timestamp (used when loading from storage).
    #[must_use]
    pub const fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = updated_at;
        self
    }

    /// Returns the access token.
    ///
    /// This is the sole authorization artifact for Admin API calls; avoid
    /// logging it.
    #[must_use]
    pub fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }
}

impl fmt::Debug for StoreCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreCredential")
            .field("shop", &self.shop)
            .field("access_token", &"[REDACTED]")
            .field("scopes", &self.scopes)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

// Verify StoreCredential is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StoreCredential>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_credential_debug_redacts_token() {
        let credential = StoreCredential::new(ShopDomain::new("shop").unwrap(), "tok_secret");
        let debug_str = format!("{credential:?}");
        assert!(debug_str.contains("[REDACTED]"));
        assert!(debug_str.contains("shop.myshopify.com"));
        assert!(!debug_str.contains("tok_secret"));
    }

    #[test]
    fn test_credential_builders() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let credential = StoreCredential::new(ShopDomain::new("shop").unwrap(), "tok")
            .with_scopes(Some("read_orders".parse().unwrap()))
            .with_updated_at(at);

        assert_eq!(credential.access_token(), "tok");
        assert_eq!(credential.updated_at, at);
        assert_eq!(credential.scopes.unwrap().to_string(), "read_orders");
    }
}
