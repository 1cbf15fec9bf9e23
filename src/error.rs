//! Error types for configuration and input validation.
//!
//! All configuration constructors return `Result<T, ConfigError>` so that a
//! missing client id or secret is caught when the service starts, not when
//! the first shop tries to install.
//!
//! # Example
//!
//! ```rust
//! use shopify_connect::{ApiKey, ConfigError};
//!
//! let result = ApiKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyApiKey)));
//! ```

use thiserror::Error;

/// Errors that can occur while building or loading configuration.
///
/// Each variant provides a clear, actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// API key (OAuth client id) cannot be empty.
    #[error("API key cannot be empty. Please provide a valid Shopify client id.")]
    EmptyApiKey,

    /// API secret key (OAuth client secret) cannot be empty.
    #[error("API secret key cannot be empty. Please provide a valid Shopify client secret.")]
    EmptyApiSecretKey,

    /// Shop domain is invalid.
    #[error("Invalid shop domain '{domain}'. Expected format: 'shop-name' or 'shop-name.myshopify.com'.")]
    InvalidShopDomain {
        /// The invalid domain that was provided.
        domain: String,
    },

    /// API version is invalid.
    #[error("Invalid API version '{version}'. Expected format: 'YYYY-MM' (e.g., '2025-10') or 'unstable'.")]
    InvalidApiVersion {
        /// The invalid version string that was provided.
        version: String,
    },

    /// Scopes are invalid.
    #[error("Invalid scopes: {reason}")]
    InvalidScopes {
        /// The reason the scopes are invalid.
        reason: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// Redirect URI is invalid.
    #[error("Invalid redirect URI '{url}'. Please provide an absolute URL with scheme (e.g., 'https://myapp.example.com/callback').")]
    InvalidRedirectUri {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A required environment variable is not set (or is blank).
    #[error("Missing environment variable: {name}")]
    MissingEnvVar {
        /// The variable name.
        name: &'static str,
    },

    /// An environment variable is set but cannot be parsed.
    #[error("Invalid environment variable {name}: {reason}")]
    InvalidEnvVar {
        /// The variable name.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}
