//! Persistence for per-shop access tokens.
//!
//! The OAuth flow depends only on the [`CredentialStore`] trait:
//!
//! - [`CredentialStore::upsert`] writes a credential, replacing any previous
//!   token for the same shop (last write wins)
//! - [`CredentialStore::lookup`] returns `Ok(None)` when no credential
//!   exists, which is distinct from a stored empty token
//!
//! Two implementations are provided:
//!
//! - [`InMemoryCredentialStore`]: a process-local map, for tests and local runs
//! - [`SqliteCredentialStore`]: an embedded, file-backed store built on `sqlx`

mod memory;
mod sqlite;

pub use memory::InMemoryCredentialStore;
pub use sqlite::SqliteCredentialStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::auth::StoreCredential;
use crate::config::ShopDomain;

/// Errors raised by credential storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database rejected or failed the operation.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The schema could not be brought up to date.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored row could not be turned back into a credential.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Storage for access tokens keyed by shop domain.
///
/// Implementations must make `upsert` atomic per shop: concurrent writers
/// for the same shop leave exactly one complete record behind.
#[async_trait]
pub trait CredentialStore: Send + Sync + std::fmt::Debug {
    /// Inserts the credential, or replaces the existing one for its shop.
    async fn upsert(&self, credential: StoreCredential) -> Result<(), StoreError>;

    /// Returns the credential for `shop`, or `None` if it was never stored.
    async fn lookup(&self, shop: &ShopDomain) -> Result<Option<StoreCredential>, StoreError>;
}
