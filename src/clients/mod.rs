//! HTTP client types for calling the Admin API once a shop is installed.
//!
//! - [`AdminClient`]: authenticated client for one shop's Admin REST API
//! - [`HttpError`]: unified error type for those calls
//! - [`HttpResponseError`]: a non-2xx response
//!
//! # Example
//!
//! ```rust,ignore
//! use shopify_connect::clients::AdminClient;
//!
//! let credential = store.lookup(&shop).await?.expect("shop is installed");
//! let client = AdminClient::new(&config, &credential, reqwest::Client::new());
//! let shop_json = client.shop_info().await?;
//! ```
//!
//! Requests are sent once; there is no retry.

mod errors;
mod http_client;

pub use errors::{HttpError, HttpResponseError};
pub use http_client::{AdminClient, ACCESS_TOKEN_HEADER};
