mod config;
mod error;
mod middleware;
mod routes;
mod state;

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use temple_core::auth::password::hash_password;
use temple_core::auth::{GuardSettings, SessionGuard};
use temple_core::cart::MemoryCartStorage;
use temple_core::events::bus::EventBus;
use temple_core::store::postgres::PgStore;
use temple_core::store::timed::TimedStore;
use temple_core::store::unconfigured::UnconfiguredStore;
use temple_core::store::Store;
use tower_http::limit::RequestBodyLimitLayer;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

const MAX_BODY_BYTES: usize = 256 * 1024;
const MIN_CART_SWEEP: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (dev convenience)
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env()
        .map_err(|e| anyhow::anyhow!("Failed to load config: {e}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    tracing::info!("Starting temple services API server");
    if config.uses_dev_secret() {
        tracing::warn!("JWT_SECRET not set; using the development secret");
    }

    let store = connect_store(&config).await?;
    let guard = SessionGuard::new(guard_settings(&config)?);
    let event_bus = EventBus::new(config.event_bus_capacity);
    let cart_storage = Arc::new(MemoryCartStorage::with_quota(config.cart_max_bytes));

    let state = state::AppState::new(store, cart_storage, guard, config, event_bus);
    let cors = middleware::cors::cors_layer(&state.config().cors_origins);
    let addr = state.config().addr();

    let sweep_every = (state.config().cart_idle_ttl / 4).max(MIN_CART_SWEEP);
    Arc::clone(state.carts()).spawn_sweeper(sweep_every);

    let app = routes::build_router(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(middleware::request_tracing::trace_layer())
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Connect to PostgreSQL and run migrations, or fall back to a store that
/// reports itself as unconfigured.
async fn connect_store(config: &AppConfig) -> anyhow::Result<Arc<dyn Store>> {
    let Some(url) = &config.database_url else {
        tracing::warn!("DATABASE_URL not set; store-backed endpoints will answer 503");
        return Ok(Arc::new(UnconfiguredStore));
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .min_connections(config.db_min_connections)
        .acquire_timeout(config.store_timeout)
        .connect(url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database: {e}"))?;

    tracing::info!("Connected to PostgreSQL");

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {e}"))?;

    tracing::info!("Database migrations applied");

    let store: Arc<dyn Store> = Arc::new(PgStore::new(pool));
    Ok(Arc::new(TimedStore::new(store, config.store_timeout)))
}

fn guard_settings(config: &AppConfig) -> anyhow::Result<GuardSettings> {
    let admin_password_hash = match (&config.admin_password_hash, &config.admin_password) {
        (Some(hash), _) => Some(hash.clone()),
        (None, Some(plain)) => {
            tracing::warn!("hashing ADMIN_PASSWORD at startup; set ADMIN_PASSWORD_HASH in production");
            Some(hash_password(plain).map_err(|e| anyhow::anyhow!("Failed to hash ADMIN_PASSWORD: {e}"))?)
        }
        (None, None) => {
            tracing::warn!("no admin password configured; admin login is disabled");
            None
        }
    };

    let session_ttl = chrono::Duration::from_std(config.session_ttl)
        .map_err(|e| anyhow::anyhow!("SESSION_TTL_SECS out of range: {e}"))?;

    Ok(GuardSettings {
        jwt_secret: config.jwt_secret.clone(),
        session_ttl,
        admin_email: config.admin_email.clone(),
        admin_password_hash,
    })
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
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
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => { tracing::info!("Received Ctrl+C, shutting down..."); }
        _ = terminate => { tracing::info!("Received SIGTERM, shutting down..."); }
    }
}
