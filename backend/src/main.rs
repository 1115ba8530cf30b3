//! Backend entry-point: loads settings, prepares storage and credentials,
//! and serves the REST API.

mod server;

use std::io;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use idtrack::inbound::http::health::HealthState;
use idtrack::outbound::persistence::{DbPool, run_migrations};
use idtrack::outbound::security::JwtAccessTokens;
use idtrack::outbound::storage::FsDocumentStore;
use idtrack::settings::AppSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| io::Error::other(format!("failed to load configuration: {e}")))?;
    let config = build_server_config(&settings).await?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).await?;
    server.await
}

async fn build_server_config(settings: &AppSettings) -> io::Result<ServerConfig> {
    let bind_addr = settings
        .bind_addr()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
    let ttl = settings
        .token_ttl()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;

    let tokens = match settings.token_secret() {
        Some(secret) => JwtAccessTokens::new(&secret, ttl),
        None if cfg!(debug_assertions) => {
            warn!("using an ephemeral token secret (dev only); tokens will not survive restart");
            JwtAccessTokens::ephemeral(ttl)
        }
        None => {
            return Err(io::Error::other(
                "IDTRACK_TOKEN_SECRET must be set in release builds",
            ));
        }
    }
    .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;

    let upload_dir = settings.upload_dir();
    let documents = FsDocumentStore::open(&upload_dir).map_err(|e| io::Error::other(e.to_string()))?;
    info!(path = %upload_dir.display(), "document storage ready");

    let config = ServerConfig::new(bind_addr, tokens, documents)
        .with_cors_origin(settings.cors_origin.clone())
        .with_admin_seed(settings.admin_seed());

    match settings.pool_config() {
        Some(pool_config) => {
            run_migrations(pool_config.database_url())
                .await
                .map_err(|e| io::Error::other(e.to_string()))?;
            let pool = DbPool::new(pool_config)
                .await
                .map_err(|e| io::Error::other(format!("database pool: {e}")))?;
            Ok(config.with_db_pool(pool))
        }
        None => Ok(config),
    }
}
