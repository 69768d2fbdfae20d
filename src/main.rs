use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tinylink::{config, db, shortener::Shortener, AppState};

// ── Entry point ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (ignore error if file is absent, env vars may already be set)
    dotenvy::dotenv().ok();

    // Initialise structured logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tinylink=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::AppConfig::from_env()?;
    tracing::info!("Starting tinylink on {}", config.bind_addr());
    tracing::info!("Base URL: {}", config.base_url);

    let pool = db::connect(&config).await?;
    db::migrate(&pool).await?;
    tracing::info!("Database migrations applied");

    // Requests are only accepted once every stored mapping is cached.
    let shortener = Shortener::start(db::SqliteStore::new(pool.clone())).await?;

    let bind_addr = config.bind_addr();
    let state = Arc::new(AppState { shortener, config });
    let app = tinylink::router(state);

    // ── Serve ──────────────────────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Shut down cleanly");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {:?}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
