//! Authentication types for the install flow.
//!
//! # Overview
//!
//! - [`AuthScopes`]: the ordered set of scopes requested from the merchant
//! - [`StoreCredential`]: an access token persisted for one shop
//! - [`oauth`]: the authorization-code flow (redirect, exchange, callback)
//!
//! # OAuth Flow
//!
//! ```rust,ignore
//! use shopify_connect::auth::oauth::{begin_auth, CallbackHandler};
//!
//! // 1. Build the authorization URL and redirect the merchant there
//! let request = begin_auth(&config, Some("my-store"))?;
//! let url = request.url();
//!
//! // 2. Handle the callback; the token is stored before this returns
//! let credential = handler.handle(&callback_query).await?;
//! ```

mod credential;
pub mod oauth;
mod scopes;

pub use credential::StoreCredential;
pub use scopes::AuthScopes;
