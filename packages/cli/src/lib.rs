// ABOUTME: Server startup and shared wiring for the catima-sync binary
// ABOUTME: Opens the database, builds the token authenticator and serves the API

use std::sync::Arc;

use anyhow::Context;
use axum::http::{HeaderName, HeaderValue, Method};
use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use catima_api::{create_router, AppState};
use catima_security::{Argon2Hasher, SqliteTokenStore, TokenAuthenticator, UserStorage};
use catima_storage::{connect, CardStorage};

pub mod cards_io;
pub mod config;

pub use config::{Config, ConfigError};

#[cfg(test)]
mod tests;

/// Install the global tracing subscriber; logs go to stderr so command
/// output on stdout stays machine-readable
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// Storage handles and the authenticator over one database
pub struct Backend {
    pub pool: SqlitePool,
    pub users: UserStorage,
    pub cards: Arc<CardStorage>,
    pub authenticator: Arc<TokenAuthenticator>,
}

impl Backend {
    pub async fn open(config: &Config) -> anyhow::Result<Self> {
        let pool = connect(&config.database_path).await.with_context(|| {
            format!(
                "Failed to open database at {}",
                config.database_path.display()
            )
        })?;
        Self::from_pool(pool, config)
    }

    pub fn from_pool(pool: SqlitePool, config: &Config) -> anyhow::Result<Self> {
        let hasher = Argon2Hasher::new(config.hash_params).context("Invalid Argon2 settings")?;
        let authenticator = TokenAuthenticator::new(
            Arc::new(SqliteTokenStore::new(pool.clone())),
            Arc::new(hasher),
        )
        .context("Failed to initialize token authenticator")?;

        Ok(Self {
            users: UserStorage::new(pool.clone()),
            cards: Arc::new(CardStorage::new(pool.clone())),
            authenticator: Arc::new(authenticator),
            pool,
        })
    }

    pub fn app_state(&self) -> AppState {
        AppState {
            authenticator: self.authenticator.clone(),
            cards: self.cards.clone(),
        }
    }
}

/// The API router, with CORS when an origin is configured
pub fn build_app(backend: &Backend, cors_origin: Option<&str>) -> anyhow::Result<Router> {
    let app = create_router(backend.app_state());

    let Some(origin) = cors_origin else {
        return Ok(app);
    };

    let origin = origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS_ORIGIN {origin:?}"))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET])
        .allow_headers([
            HeaderName::from_static("x-token-username"),
            HeaderName::from_static("x-token-secret"),
        ]);

    Ok(app.layer(cors))
}

pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let backend = Backend::open(&config).await?;
    let app = build_app(&backend, config.cors_origin.as_deref())?;

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(
        address = %addr,
        database = %config.database_path.display(),
        "Server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
