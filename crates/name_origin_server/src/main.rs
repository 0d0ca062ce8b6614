//! name_origin_server - standalone REST server.
//!
//! Reads config from env vars (a `.env` file is honoured):
//!   NAME_ORIGIN_DATABASE_URL   - SQLite URL (default: sqlite://./database.db)
//!   NAME_ORIGIN_JWT_SECRET     - JWT HMAC secret (required)
//!   NAME_ORIGIN_ADMIN_PASSWORD - password for POST /token (required)
//!   NAME_ORIGIN_BIND_ADDR      - listen address (default: 0.0.0.0:8000)

use std::sync::Arc;

use anyhow::Context;
use name_origin_core::clients::{
    CountryDirectory, NationalityClassifier, NationalizeClient, RestCountriesClient,
};
use name_origin_core::{db, OriginRepository, OriginService};
use name_origin_server::auth::AuthConfig;
use name_origin_server::config::ServerConfig;
use name_origin_server::router::build_router;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,name_origin_server=debug,name_origin_core=debug,tower_http=debug".into()
            }),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let pool = db::connect(&config.database)
        .await
        .context("failed to open database")?;

    let classifier: Arc<dyn NationalityClassifier> = Arc::new(NationalizeClient::new(
        &config.nationalize_base_url,
        config.upstream_timeout,
    )?);
    let directory: Arc<dyn CountryDirectory> = Arc::new(RestCountriesClient::new(
        &config.rest_countries_base_url,
        config.upstream_timeout,
    )?);

    let service = Arc::new(OriginService::new(
        OriginRepository::new(pool.clone()),
        classifier,
        directory,
    ));

    let auth = AuthConfig::new(
        config.jwt_secret.as_bytes(),
        config.token_ttl,
        config.admin.clone(),
    );

    let app = build_router(service, auth);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;
    tracing::info!("name_origin_server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    pool.close().await;
    tracing::info!("shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
    }
}
