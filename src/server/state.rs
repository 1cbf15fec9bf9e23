//! Application state shared across handlers.

use std::sync::Arc;

use crate::auth::oauth::{CallbackHandler, CodeExchanger, TokenExchanger};
use crate::auth::StoreCredential;
use crate::clients::AdminClient;
use crate::config::AppConfig;
use crate::store::CredentialStore;

/// Application state shared across all handlers.
///
/// Cloning is cheap; everything lives behind one `Arc`.
#[derive(Clone, Debug)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Debug)]
struct AppStateInner {
    config: Arc<AppConfig>,
    store: Arc<dyn CredentialStore>,
    callback: CallbackHandler,
    http: reqwest::Client,
}

impl AppState {
    /// Creates state that exchanges codes with Shopify over HTTPS.
    #[must_use]
    pub fn new(config: AppConfig, store: Arc<dyn CredentialStore>) -> Self {
        let config = Arc::new(config);
        let http = reqwest::Client::new();
        let exchanger = Arc::new(TokenExchanger::with_client(config.clone(), http.clone()));
        Self::from_parts(config, store, exchanger, http)
    }

    /// Creates state with a custom code exchanger.
    #[must_use]
    pub fn with_exchanger(
        config: AppConfig,
        store: Arc<dyn CredentialStore>,
        exchanger: Arc<dyn CodeExchanger>,
    ) -> Self {
        Self::from_parts(Arc::new(config), store, exchanger, reqwest::Client::new())
    }

    fn from_parts(
        config: Arc<AppConfig>,
        store: Arc<dyn CredentialStore>,
        exchanger: Arc<dyn CodeExchanger>,
        http: reqwest::Client,
    ) -> Self {
        let callback = CallbackHandler::new(config.clone(), exchanger, store.clone());
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                callback,
                http,
            }),
        }
    }

    /// Returns the app configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Returns the credential store.
    #[must_use]
    pub fn store(&self) -> &dyn CredentialStore {
        self.inner.store.as_ref()
    }

    /// Returns the OAuth callback handler.
    #[must_use]
    pub fn callback_handler(&self) -> &CallbackHandler {
        &self.inner.callback
    }

    /// Returns an Admin API client for an installed shop.
    #[must_use]
    pub fn admin_client(&self, credential: &StoreCredential) -> AdminClient {
        AdminClient::new(&self.inner.config, credential, self.inner.http.clone())
    }
}
