//! SQLite storage implementation.
//!
//! A file-based storage backend using SQLite. Good for:
//! - Local development
//! - Single-server deployments
//! - Testing with persistent data
//!
//! File databases run in WAL mode so readers are not blocked while a load
//! batch holds the write lock.

use std::collections::HashSet;
use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};
use tracing::{debug, info};

use super::OPTIONAL_COLUMNS;
use crate::error::Result;
use crate::traits::store::{ProviderBatch, ProviderStore};
use crate::types::{NewProvider, Provider};

const SELECT_PROVIDER: &str = r#"
    SELECT id, name, service_type, neighborhood, contact, rating,
           address, street, city, postal_code, website, full_phone, email,
           reviews_count, one_star, two_star, three_star, four_star, five_star, reviews
    FROM providers
"#;

/// SQLite-based provider store.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new SQLite store with the given connection URL.
    ///
    /// # Example URLs
    /// - `sqlite::memory:` - In-memory database (ephemeral)
    /// - `sqlite://providers.db` - File-based database, created if missing
    pub async fn new(database_url: &str) -> Result<Self> {
        let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");

        let mut options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        if !in_memory {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        // Every connection to `:memory:` is a separate database, so pin one
        // connection for the lifetime of the pool.
        let pool = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?
        };

        info!(in_memory, "Opened SQLite provider store");
        Ok(Self { pool })
    }

    /// Create an in-memory SQLite store (for testing).
    pub async fn in_memory() -> Result<Self> {
        Self::new("sqlite::memory:").await
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn column_type(column: &str) -> &'static str {
    match column {
        "rating" => "REAL",
        "reviews_count" | "one_star" | "two_star" | "three_star" | "four_star" | "five_star" => {
            "INTEGER"
        }
        _ => "TEXT",
    }
}

#[async_trait]
impl ProviderStore for SqliteStore {
    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS providers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                service_type TEXT NOT NULL,
                neighborhood TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_providers_service_type ON providers(service_type);
            CREATE INDEX IF NOT EXISTS idx_providers_neighborhood ON providers(neighborhood);
            CREATE INDEX IF NOT EXISTS idx_providers_name_service_type ON providers(name, service_type);
            "#,
        )
        .execute(&self.pool)
        .await?;

        let existing: HashSet<String> =
            sqlx::query_scalar::<_, String>("SELECT name FROM pragma_table_info('providers')")
                .fetch_all(&self.pool)
                .await?
                .into_iter()
                .collect();

        for column in OPTIONAL_COLUMNS {
            if existing.contains(*column) {
                continue;
            }
            debug!(column, "Adding provider column");
            sqlx::query(&format!(
                "ALTER TABLE providers ADD COLUMN {} {}",
                column,
                column_type(column)
            ))
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM providers")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn distinct_service_types(&self) -> Result<Vec<String>> {
        let values = sqlx::query_scalar(
            "SELECT DISTINCT service_type FROM providers ORDER BY service_type",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(values)
    }

    async fn distinct_neighborhoods(&self) -> Result<Vec<String>> {
        let values = sqlx::query_scalar(
            "SELECT DISTINCT neighborhood FROM providers ORDER BY neighborhood",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(values)
    }

    async fn find_matching(&self, service_type: &str, neighborhood: &str) -> Result<Vec<Provider>> {
        let providers = sqlx::query_as::<_, Provider>(&format!(
            "{} WHERE service_type = ? AND neighborhood = ? ORDER BY rating IS NULL, rating DESC, name",
            SELECT_PROVIDER
        ))
        .bind(service_type)
        .bind(neighborhood)
        .fetch_all(&self.pool)
        .await?;
        Ok(providers)
    }

    async fn service_type_counts(&self) -> Result<Vec<(String, i64)>> {
        let counts = sqlx::query_as(
            r#"
            SELECT service_type, COUNT(*) AS total
            FROM providers
            GROUP BY service_type
            ORDER BY total DESC, service_type
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(counts)
    }

    async fn neighborhood_counts(&self, limit: i64) -> Result<Vec<(String, i64)>> {
        let counts = sqlx::query_as(
            r#"
            SELECT neighborhood, COUNT(*) AS total
            FROM providers
            GROUP BY neighborhood
            ORDER BY total DESC, neighborhood
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(counts)
    }

    async fn sample(&self, limit: i64) -> Result<Vec<Provider>> {
        let providers =
            sqlx::query_as::<_, Provider>(&format!("{} ORDER BY id LIMIT ?", SELECT_PROVIDER))
                .bind(limit)
                .fetch_all(&self.pool)
                .await?;
        Ok(providers)
    }

    async fn begin(&self) -> Result<Box<dyn ProviderBatch>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(SqliteBatch { tx }))
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// One SQLite transaction. Dropping it without committing rolls back.
struct SqliteBatch {
    tx: Transaction<'static, Sqlite>,
}

#[async_trait]
impl ProviderBatch for SqliteBatch {
    async fn exists(&mut self, name: &str, service_type: &str) -> Result<bool> {
        let exists = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM providers WHERE name = ? AND service_type = ?)",
        )
        .bind(name)
        .bind(service_type)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(exists)
    }

    async fn insert(&mut self, provider: &NewProvider) -> Result<i64> {
        let dist = provider.review_distribution;
        let result = sqlx::query(
            r#"
            INSERT INTO providers (
                name, service_type, neighborhood, contact, rating,
                address, street, city, postal_code, website, full_phone, email,
                reviews_count, one_star, two_star, three_star, four_star, five_star, reviews
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&provider.name)
        .bind(&provider.service_type)
        .bind(&provider.neighborhood)
        .bind(&provider.contact)
        .bind(provider.rating)
        .bind(&provider.address)
        .bind(&provider.street)
        .bind(&provider.city)
        .bind(&provider.postal_code)
        .bind(&provider.website)
        .bind(&provider.full_phone)
        .bind(&provider.email)
        .bind(provider.reviews_count)
        .bind(dist.map(|d| d.one_star))
        .bind(dist.map(|d| d.two_star))
        .bind(dist.map(|d| d.three_star))
        .bind(dist.map(|d| d.four_star))
        .bind(dist.map(|d| d.five_star))
        .bind(&provider.reviews)
        .execute(&mut *self.tx)
        .await?;
        Ok(result.last_insert_rowid())
    }

    async fn clear(&mut self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM providers")
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}
