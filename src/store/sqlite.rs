//! Embedded SQLite credential store.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use super::{CredentialStore, StoreError};
use crate::auth::{AuthScopes, StoreCredential};
use crate::config::ShopDomain;

const MAX_CONNECTIONS: u32 = 5;

/// Internal row type for `store_credentials` queries.
#[derive(Debug, sqlx::FromRow)]
struct CredentialRow {
    shop_domain: String,
    access_token: String,
    scope: Option<String>,
    updated_at: String,
}

impl TryFrom<CredentialRow> for StoreCredential {
    type Error = StoreError;

    fn try_from(row: CredentialRow) -> Result<Self, Self::Error> {
        let shop = ShopDomain::new(&row.shop_domain).map_err(|e| {
            StoreError::DataCorruption(format!("shop_domain '{}': {e}", row.shop_domain))
        })?;

        let scopes = match row.scope.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<AuthScopes>()
                    .map_err(|e| StoreError::DataCorruption(format!("scope: {e}")))?,
            ),
        };

        let updated_at = DateTime::parse_from_rfc3339(&row.updated_at)
            .map_err(|e| StoreError::DataCorruption(format!("updated_at: {e}")))?
            .with_timezone(&Utc);

        Ok(Self::new(shop, row.access_token)
            .with_scopes(scopes)
            .with_updated_at(updated_at))
    }
}

/// A credential store persisted in a SQLite database.
///
/// The schema is created by embedded migrations when the store is opened.
/// Writes use `INSERT .. ON CONFLICT DO UPDATE`, so a shop's row is
/// replaced atomically.
#[derive(Debug, Clone)]
pub struct SqliteCredentialStore {
    pool: SqlitePool,
}

impl SqliteCredentialStore {
    /// Opens (creating if necessary) the database at `database_url` and
    /// runs pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the URL is invalid or the
    /// database cannot be opened, and [`StoreError::Migration`] if the
    /// schema cannot be applied.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    /// Opens a private in-memory database.
    ///
    /// The pool holds a single connection that is never recycled, since
    /// each SQLite in-memory connection is its own database.
    ///
    /// # Errors
    ///
    /// Same as [`SqliteCredentialStore::connect`].
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    /// Wraps an existing pool, running pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Migration`] if the schema cannot be applied.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    /// Closes the underlying pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn upsert(&self, credential: StoreCredential) -> Result<(), StoreError> {
        let scope = credential.scopes.as_ref().map(ToString::to_string);

        sqlx::query(
            r"
            INSERT INTO store_credentials (shop_domain, access_token, scope, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(shop_domain) DO UPDATE SET
                access_token = excluded.access_token,
                scope = excluded.scope,
                updated_at = excluded.updated_at
            ",
        )
        .bind(credential.shop.as_ref())
        .bind(credential.access_token())
        .bind(scope)
        .bind(credential.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn lookup(&self, shop: &ShopDomain) -> Result<Option<StoreCredential>, StoreError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r"
            SELECT shop_domain, access_token, scope, updated_at
            FROM store_credentials
            WHERE shop_domain = ?1
            ",
        )
        .bind(shop.as_ref())
        .fetch_optional(&self.pool)
        .await?;

        row.map(StoreCredential::try_from).transpose()
    }
}
