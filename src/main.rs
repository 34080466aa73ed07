//! LearnHub Server: authentication and session service
//!
//! Main entry point that wires all crates together and starts the server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use learnhub_api::AppState;
use learnhub_auth::{PasswordHasher, SessionCleanup};
use learnhub_cache::CacheManager;
use learnhub_core::config::AppConfig;
use learnhub_database::repositories::{AccountRepository, SessionRepository};
use learnhub_database::{
    DatabasePool, MemoryAccountRepository, MemorySessionRepository, PgAccountRepository,
    PgSessionRepository,
};

#[tokio::main]
async fn main() {
    let env = std::env::var("LEARNHUB_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e:#}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!("Starting LearnHub v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Repositories ─────────────────────────────────────
    let (accounts, session_repo, db_pool) = init_repositories(&config).await?;

    // ── Step 2: Cache ────────────────────────────────────────────
    tracing::info!(provider = %config.cache.provider, "Initializing cache...");
    let cache = Arc::new(
        CacheManager::new(&config.cache)
            .await
            .context("Cache init failed")?,
    );

    // ── Step 3: Auth components ──────────────────────────────────
    let cleanup_period = Duration::from_secs(config.session.cleanup_interval_minutes.max(1) * 60);
    let bind_address = config.server.bind_address();

    let state = AppState::build(
        config,
        accounts,
        session_repo,
        cache,
        Arc::new(PasswordHasher::new()),
    )
    .context("Auth init failed")?;

    // ── Step 4: Expired session sweep ────────────────────────────
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let cleanup_handle = SessionCleanup::new(Arc::clone(&state.sessions)).spawn(cleanup_period);
    tracing::info!(
        period_secs = cleanup_period.as_secs(),
        "Session cleanup scheduled"
    );

    // ── Step 5: HTTP server ──────────────────────────────────────
    let app = learnhub_api::build_app(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;

    tracing::info!("LearnHub server listening on {bind_address}");

    // ── Step 6: Graceful shutdown ────────────────────────────────
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        let _ = shutdown_rx.changed().await;
    })
    .await
    .context("Server error")?;

    cleanup_handle.abort();
    if let Some(pool) = db_pool {
        pool.close().await;
    }

    tracing::info!("LearnHub server shut down gracefully");
    Ok(())
}

/// Picks the repository backend named by `database.provider`.
async fn init_repositories(
    config: &AppConfig,
) -> anyhow::Result<(
    Arc<dyn AccountRepository>,
    Arc<dyn SessionRepository>,
    Option<DatabasePool>,
)> {
    match config.database.provider.as_str() {
        "postgres" => {
            let db = DatabasePool::connect(&config.database)
                .await
                .context("Database connection failed")?;

            learnhub_database::migration::run_migrations(db.pool())
                .await
                .context("Migration failed")?;
            tracing::info!("Database migrations complete");

            let accounts: Arc<dyn AccountRepository> =
                Arc::new(PgAccountRepository::new(db.pool().clone()));
            let sessions: Arc<dyn SessionRepository> =
                Arc::new(PgSessionRepository::new(db.pool().clone()));
            Ok((accounts, sessions, Some(db)))
        }
        "memory" => {
            tracing::warn!("Using in-memory repositories; data is lost on restart");
            let accounts: Arc<dyn AccountRepository> = Arc::new(MemoryAccountRepository::new());
            let sessions: Arc<dyn SessionRepository> = Arc::new(MemorySessionRepository::new());
            Ok((accounts, sessions, None))
        }
        other => anyhow::bail!("Unknown database provider: '{other}'. Supported: postgres, memory"),
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
