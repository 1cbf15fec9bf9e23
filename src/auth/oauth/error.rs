//! OAuth-specific error types.
//!
//! # Error Types
//!
//! - [`OAuthError::InvalidRequest`]: the install request lacks a usable shop
//! - [`OAuthError::InvalidCallback`]: callback parameters are missing or malformed
//! - [`OAuthError::InvalidHmac`]: a signed callback failed verification
//! - [`OAuthError::UpstreamRejected`]: Shopify refused the code or credentials
//! - [`OAuthError::MalformedUpstreamResponse`]: Shopify answered 200 without a token
//! - [`OAuthError::Transport`]: Shopify could not be reached
//! - [`OAuthError::StorageFailure`]: the token could not be persisted
//!
//! None of these are retried: authorization codes are single-use, so the
//! merchant has to restart the install.
//!
//! # Example
//!
//! ```rust
//! use shopify_connect::auth::oauth::OAuthError;
//!
//! let error = OAuthError::UpstreamRejected {
//!     status: 401,
//!     message: "invalid_client".to_string(),
//! };
//! assert!(error.to_string().contains("401"));
//! assert!(!error.is_client_error());
//! ```

use crate::store::StoreError;
use thiserror::Error;

/// Errors that can occur during the OAuth install flow.
#[derive(Debug, Error)]
pub enum OAuthError {
    /// The install request is missing a shop, or the shop is not a valid
    /// `myshopify.com` domain.
    #[error("Invalid request: {reason}")]
    InvalidRequest {
        /// Description of what's wrong with the request.
        reason: String,
    },

    /// Callback parameters are missing, empty, or malformed.
    #[error("Invalid callback: {reason}")]
    InvalidCallback {
        /// Description of what's invalid about the callback.
        reason: String,
    },

    /// The callback carried an `hmac` parameter that does not match.
    #[error("HMAC signature validation failed")]
    InvalidHmac,

    /// The token endpoint answered with a non-200 status.
    #[error("Shopify rejected the token exchange with status {status}: {message}")]
    UpstreamRejected {
        /// The HTTP status code returned.
        status: u16,
        /// The response body.
        message: String,
    },

    /// The token endpoint answered 200 but without a usable access token.
    #[error("Shopify returned an unusable token response: {reason}")]
    MalformedUpstreamResponse {
        /// What was wrong with the response.
        reason: String,
    },

    /// The token endpoint could not be reached.
    #[error("Could not reach Shopify: {0}")]
    Transport(#[from] reqwest::Error),

    /// The access token was obtained but could not be stored.
    #[error("Failed to store access token: {0}")]
    StorageFailure(#[from] StoreError),
}

impl OAuthError {
    /// Returns `true` when the caller can fix the problem by correcting
    /// their input (missing or malformed parameters).
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequest { .. } | Self::InvalidCallback { .. } | Self::InvalidHmac
        )
    }

    /// Returns `true` when the failure came from Shopify's side of the
    /// exchange.
    #[must_use]
    pub const fn is_upstream_error(&self) -> bool {
        matches!(
            self,
            Self::UpstreamRejected { .. }
                | Self::MalformedUpstreamResponse { .. }
                | Self::Transport(_)
        )
    }
}

// Verify OAuthError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<OAuthError>();
};
