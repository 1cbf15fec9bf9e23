//! Loading configuration from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CLIENT_ID` - Shopify app client id
//! - `CLIENT_SECRET` - Shopify app client secret
//! - `REDIRECT_URI` - Absolute callback URL registered with the app
//!
//! ## Optional
//! - `SCOPES` - Comma separated scopes (default: `read_orders`)
//! - `SHOPIFY_API_VERSION` - Admin API version (default: `2025-10`)
//! - `LANDING_URL` - Post-install redirect target (default: `/installed`)
//! - `HOST` - Bind address (default: `0.0.0.0`)
//! - `PORT` - Listen port (default: `8000`)
//! - `DATABASE_URL` - SQLite connection string
//!   (default: `sqlite://shop_credentials.db?mode=rwc`)
//!
//! A `.env` file in the working directory is honoured by the binary via
//! `dotenvy` before these are read.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use secrecy::SecretString;

use super::{ApiKey, ApiSecretKey, ApiVersion, AppConfig, RedirectUri};
use crate::error::ConfigError;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_DATABASE_URL: &str = "sqlite://shop_credentials.db?mode=rwc";

/// Reads a variable, treating blank values as unset.
fn optional<F>(lookup: &F, name: &'static str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, name).ok_or(ConfigError::MissingEnvVar { name })
}

impl AppConfig {
    /// Loads the OAuth application configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `CLIENT_ID`,
    /// `CLIENT_SECRET` or `REDIRECT_URI` is unset or blank, and a
    /// validation error when a value is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder()
            .api_key(ApiKey::new(required(&lookup, "CLIENT_ID")?)?)
            .api_secret_key(ApiSecretKey::new(required(&lookup, "CLIENT_SECRET")?)?)
            .redirect_uri(RedirectUri::new(required(&lookup, "REDIRECT_URI")?)?);

        if let Some(scopes) = optional(&lookup, "SCOPES") {
            builder = builder.scopes(scopes.parse()?);
        }
        if let Some(version) = optional(&lookup, "SHOPIFY_API_VERSION") {
            builder = builder.api_version(version.parse::<ApiVersion>()?);
        }
        if let Some(landing) = optional(&lookup, "LANDING_URL") {
            builder = builder.landing_url(landing);
        }

        builder.build()
    }
}

/// Listener and storage settings for the binary.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to.
    pub host: IpAddr,
    /// Port to listen on.
    pub port: u16,
    /// SQLite connection string for the credential store.
    pub database_url: SecretString,
}

impl ServerConfig {
    /// Loads server settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] if `HOST` or `PORT` cannot be
    /// parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads server settings through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ServerConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host: IpAddr = match optional(&lookup, "HOST") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidEnvVar {
                name: "HOST",
                reason: format!("'{raw}' is not an IP address"),
            })?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let port: u16 = match optional(&lookup, "PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidEnvVar {
                name: "PORT",
                reason: format!("'{raw}' is not a valid port"),
            })?,
            None => DEFAULT_PORT,
        };

        let database_url = optional(&lookup, "DATABASE_URL")
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        Ok(Self {
            host,
            port,
            database_url: SecretString::from(database_url),
        })
    }

    /// Returns the socket address to listen on.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
