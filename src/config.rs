use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite connection string, e.g. "sqlite:./urls.db"
    pub database_url: String,

    /// Upper bound on pooled SQLite connections
    pub database_max_connections: u32,

    /// Host to bind the HTTP server to, e.g. "0.0.0.0"
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Public base URL used when logging short links, e.g. "https://go.example.com"
    /// Must NOT have a trailing slash.
    pub base_url: String,
}

impl AppConfig {
    /// Load configuration from environment variables (populated by dotenvy before this is called).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = var("PORT")
            .unwrap_or_else(|| "8000".into())
            .parse::<u16>()
            .context("PORT must be a valid port number (1–65535)")?;

        let database_max_connections = var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".into())
            .parse::<u32>()
            .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?;

        if database_max_connections == 0 {
            anyhow::bail!("DATABASE_MAX_CONNECTIONS must be at least 1");
        }

        let base_url = var("BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{port}"))
            .trim_end_matches('/')
            .to_owned();

        Ok(Self {
            database_url: var("DATABASE_URL").unwrap_or_else(|| "sqlite:./urls.db".into()),
            database_max_connections,
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            base_url,
        })
    }

    /// Socket address string the listener binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
