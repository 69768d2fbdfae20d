use thiserror::Error;

/// Failures raised by a [`UrlStore`](crate::db::UrlStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// An insert violated the uniqueness of either `short` or `original`.
    #[error("duplicate key: code or original URL already stored")]
    DuplicateKey,

    /// Any other persistence fault (I/O, pool closed, corruption, ...).
    #[error("store failure: {0}")]
    Failure(#[from] sqlx::Error),
}

impl StoreError {
    /// Classify a raw sqlx error, separating unique-constraint violations
    /// from every other database fault.
    pub fn from_sqlx(e: sqlx::Error) -> Self {
        match e.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => StoreError::DuplicateKey,
            _ => StoreError::Failure(e),
        }
    }
}

/// Failures surfaced by the [`Shortener`](crate::shortener::Shortener).
#[derive(Debug, Error)]
pub enum ShortenError {
    #[error("URL must not be empty")]
    EmptyUrl,

    #[error("short code '{0}' not found")]
    NotFound(String),

    #[error(transparent)]
    StoreFailure(#[from] StoreError),
}
