//! SQLite record store using sqlx.
//!
//! # Example
//!
//! ```rust,ignore
//! use mailrecord::store::SqliteStore;
//!
//! let store = SqliteStore::connect("sqlite:emails.db", "emails").await?;
//! ```

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

use crate::error::StoreError;
use crate::record::EmailRecord;

use super::{validate_namespace, RecordStore};

/// Record store backed by one SQLite table, named after the namespace.
///
/// Scan order is insertion order (`rowid`).
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    insert_sql: String,
    select_sql: String,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `uri` and ensure the
    /// table for `namespace` exists.
    pub async fn connect(uri: &str, namespace: &str) -> Result<Self, StoreError> {
        validate_namespace(namespace)?;

        let options = SqliteConnectOptions::from_str(uri)
            .map_err(|e| StoreError::Configuration(e.to_string()))?
            .create_if_missing(true);

        // Every connection to `:memory:` is a separate database, so keep
        // exactly one connection alive for the life of the pool.
        let in_memory = uri.contains(":memory:") || uri.contains("mode=memory");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Self::with_pool(pool, namespace).await
    }

    /// Use an existing pool.
    pub async fn with_pool(pool: SqlitePool, namespace: &str) -> Result<Self, StoreError> {
        validate_namespace(namespace)?;

        let create_sql = format!(
            "CREATE TABLE IF NOT EXISTS \"{}\" (
                id TEXT PRIMARY KEY NOT NULL,
                recipient TEXT NOT NULL,
                subject TEXT NOT NULL,
                message TEXT NOT NULL,
                created TEXT NOT NULL
            )",
            namespace
        );
        sqlx::query(&create_sql).execute(&pool).await?;

        tracing::debug!(namespace = %namespace, "SQLite record store ready");

        Ok(Self {
            pool,
            insert_sql: format!(
                "INSERT INTO \"{}\" (id, recipient, subject, message, created) VALUES (?, ?, ?, ?, ?)",
                namespace
            ),
            select_sql: format!(
                "SELECT id, recipient, subject, message, created FROM \"{}\" ORDER BY rowid",
                namespace
            ),
        })
    }

    fn map_row(row: &SqliteRow) -> Result<EmailRecord, StoreError> {
        let created: DateTime<Utc> = row.try_get("created")?;
        Ok(EmailRecord {
            id: Some(row.try_get("id")?),
            to: row.try_get("recipient")?,
            subject: row.try_get("subject")?,
            message: row.try_get("message")?,
            created,
        })
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn insert(&self, record: &EmailRecord) -> Result<String, StoreError> {
        let id = uuid::Uuid::new_v4().to_string();

        sqlx::query(&self.insert_sql)
            .bind(&id)
            .bind(&record.to)
            .bind(&record.subject)
            .bind(&record.message)
            .bind(record.created)
            .execute(&self.pool)
            .await?;

        Ok(id)
    }

    async fn find_all(&self) -> Result<Vec<EmailRecord>, StoreError> {
        let rows = sqlx::query(&self.select_sql).fetch_all(&self.pool).await?;
        rows.iter().map(Self::map_row).collect()
    }

    fn store_name(&self) -> &'static str {
        "sqlite"
    }
}
