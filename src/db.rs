use crate::{config::AppConfig, error::StoreError, models::UrlMapping};
use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};

// ── Store interface ────────────────────────────────────────────────────────

/// Durable, crash-safe persistence of the code <-> original mapping.
///
/// Implementations must enforce uniqueness of both the code and the original
/// URL themselves: the shortener's check-then-insert is not atomic, and it
/// relies on [`StoreError::DuplicateKey`] to detect lost races.
#[async_trait]
pub trait UrlStore: Send + Sync {
    /// Persist a new mapping. Fails with [`StoreError::DuplicateKey`] if
    /// either the code or the original is already stored.
    async fn insert(&self, code: &str, original: &str) -> Result<(), StoreError>;

    async fn find_by_original(&self, original: &str) -> Result<Option<UrlMapping>, StoreError>;

    async fn find_by_code(&self, code: &str) -> Result<Option<UrlMapping>, StoreError>;

    /// Every stored mapping. Re-runnable; used to (re)build the cache.
    async fn load_all(&self) -> Result<Vec<UrlMapping>, StoreError>;
}

// ── Pool setup ─────────────────────────────────────────────────────────────

/// Open the SQLite connection pool described by `config`, creating the
/// database file if it doesn't exist yet.
pub async fn connect(config: &AppConfig) -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect_with(
            config
                .database_url
                .parse::<SqliteConnectOptions>()?
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal),
        )
        .await?;

    Ok(pool)
}

/// Run the embedded migrations (files in migrations/).
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

// ── SQLite implementation ──────────────────────────────────────────────────

/// [`UrlStore`] backed by the `urls` table.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UrlStore for SqliteStore {
    async fn insert(&self, code: &str, original: &str) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO urls (short, original) VALUES (?1, ?2)")
            .bind(code)
            .bind(original)
            .execute(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)?;

        Ok(())
    }

    async fn find_by_original(&self, original: &str) -> Result<Option<UrlMapping>, StoreError> {
        let mapping: Option<UrlMapping> =
            sqlx::query_as("SELECT short, original FROM urls WHERE original = ?1")
                .bind(original)
                .fetch_optional(&self.pool)
                .await?;

        Ok(mapping)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<UrlMapping>, StoreError> {
        let mapping: Option<UrlMapping> =
            sqlx::query_as("SELECT short, original FROM urls WHERE short = ?1")
                .bind(code)
                .fetch_optional(&self.pool)
                .await?;

        Ok(mapping)
    }

    async fn load_all(&self) -> Result<Vec<UrlMapping>, StoreError> {
        let mappings: Vec<UrlMapping> = sqlx::query_as("SELECT short, original FROM urls")
            .fetch_all(&self.pool)
            .await?;

        Ok(mappings)
    }
}
