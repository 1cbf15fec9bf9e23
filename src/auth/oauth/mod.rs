//! OAuth authorization code grant for Shopify app installs.
//!
//! The install flow has two legs:
//!
//! 1. **Authorization** ([`begin_auth`]): turn the merchant's shop into an
//!    [`AuthorizationRequest`] and redirect the browser to its URL.
//!
//! 2. **Callback** ([`CallbackHandler`]): when Shopify redirects back,
//!    validate the parameters, exchange the code with a [`CodeExchanger`]
//!    and persist the resulting token in a
//!    [`CredentialStore`](crate::store::CredentialStore).
//!
//! # Security
//!
//! - If the callback carries an `hmac` parameter it is verified with
//!   HMAC-SHA256 and a constant-time comparison ([`hmac`]).
//! - Shop values are normalized and restricted to `myshopify.com` before
//!   they are used to build any URL.
//! - The client secret and access tokens never appear in `Debug` output.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use shopify_connect::auth::oauth::{begin_auth, CallbackHandler, CallbackQuery, TokenExchanger};
//! use shopify_connect::store::InMemoryCredentialStore;
//!
//! let request = begin_auth(&config, Some("my-store"))?;
//! // redirect to request.url()
//!
//! let config = Arc::new(config);
//! let handler = CallbackHandler::new(
//!     config.clone(),
//!     Arc::new(TokenExchanger::new(config)),
//!     Arc::new(InMemoryCredentialStore::new()),
//! );
//! let credential = handler.handle(&callback_query).await?;
//! ```

mod begin_auth;
mod error;
pub mod hmac;
mod token_exchange;
mod validate_callback;

pub use begin_auth::{begin_auth, AuthorizationRequest, AUTHORIZE_PATH};
pub use error::OAuthError;
pub use token_exchange::{
    AccessTokenGrant, AccessTokenResponse, CodeExchanger, ProviderResponse, TokenExchanger,
    ACCESS_TOKEN_PATH,
};
pub use validate_callback::{CallbackHandler, CallbackQuery, CallbackState};
