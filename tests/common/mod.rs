#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tinylink::{
    codegen::CodeGenerator, config::AppConfig, db, db::SqliteStore, db::UrlStore,
    error::StoreError, models::UrlMapping, shortener::Shortener, AppState,
};
use tokio::sync::Barrier;

/// Fresh in-memory database with the schema applied.
///
/// A single connection that never expires: every connection to
/// `sqlite::memory:` would otherwise see its own empty database.
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    db::migrate(&pool).await.unwrap();
    pool
}

pub async fn insert_mapping(pool: &SqlitePool, code: &str, original: &str) {
    sqlx::query("INSERT INTO urls (short, original) VALUES (?1, ?2)")
        .bind(code)
        .bind(original)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn count_rows(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM urls")
        .fetch_one(pool)
        .await
        .unwrap()
}

pub fn test_config() -> AppConfig {
    AppConfig::from_lookup(|key| match key {
        "DATABASE_URL" => Some("sqlite::memory:".into()),
        _ => None,
    })
    .unwrap()
}

pub async fn create_test_state(pool: SqlitePool) -> Arc<AppState> {
    let shortener = Shortener::start(SqliteStore::new(pool)).await.unwrap();
    Arc::new(AppState {
        shortener,
        config: test_config(),
    })
}

/// Hands out a fixed sequence of codes, repeating the last one forever.
pub struct ScriptedCodes {
    codes: Vec<&'static str>,
    next: AtomicUsize,
}

impl ScriptedCodes {
    pub fn new(codes: Vec<&'static str>) -> Self {
        Self {
            codes,
            next: AtomicUsize::new(0),
        }
    }
}

impl CodeGenerator for ScriptedCodes {
    fn generate(&self) -> String {
        let i = self.next.fetch_add(1, Ordering::SeqCst);
        self.codes[i.min(self.codes.len() - 1)].to_owned()
    }
}

/// Wraps a store and holds the first `gated` calls to `find_by_original` at a
/// barrier, so concurrent shorten calls all miss the store before any of them
/// inserts.
pub struct GatedStore<S> {
    inner: S,
    barrier: Barrier,
    gated: usize,
    seen: AtomicUsize,
    pub inserts: Mutex<Vec<String>>,
}

impl<S> GatedStore<S> {
    pub fn new(inner: S, gated: usize) -> Self {
        Self {
            inner,
            barrier: Barrier::new(gated),
            gated,
            seen: AtomicUsize::new(0),
            inserts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl<S: UrlStore> UrlStore for GatedStore<S> {
    async fn insert(&self, code: &str, original: &str) -> Result<(), StoreError> {
        self.inserts.lock().unwrap().push(code.to_owned());
        self.inner.insert(code, original).await
    }

    async fn find_by_original(&self, original: &str) -> Result<Option<UrlMapping>, StoreError> {
        let found = self.inner.find_by_original(original).await?;
        if self.seen.fetch_add(1, Ordering::SeqCst) < self.gated {
            self.barrier.wait().await;
        }
        Ok(found)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<UrlMapping>, StoreError> {
        self.inner.find_by_code(code).await
    }

    async fn load_all(&self) -> Result<Vec<UrlMapping>, StoreError> {
        self.inner.load_all().await
    }
}

/// Counts store reads so tests can tell cache hits from store round-trips.
pub struct CountingStore<S> {
    inner: S,
    pub code_lookups: AtomicUsize,
    pub original_lookups: AtomicUsize,
}

impl<S> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            code_lookups: AtomicUsize::new(0),
            original_lookups: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl<S: UrlStore> UrlStore for CountingStore<S> {
    async fn insert(&self, code: &str, original: &str) -> Result<(), StoreError> {
        self.inner.insert(code, original).await
    }

    async fn find_by_original(&self, original: &str) -> Result<Option<UrlMapping>, StoreError> {
        self.original_lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_original(original).await
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<UrlMapping>, StoreError> {
        self.code_lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_code(code).await
    }

    async fn load_all(&self) -> Result<Vec<UrlMapping>, StoreError> {
        self.inner.load_all().await
    }
}
