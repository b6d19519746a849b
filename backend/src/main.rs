//! Backend entry-point: bootstraps keys, storage and the first account, then
//! serves the REST API and OpenAPI docs.

mod server;

use std::fmt::Display;
use std::sync::Arc;

use actix_web::web;
use chrono::TimeDelta;
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use food_api::domain::{TokenService, ensure_initial_user};
use food_api::inbound::http::health::HealthState;
use food_api::outbound::keys::FileKeyStore;
use food_api::outbound::persistence::{
    DbPool, DieselUserRepository, PoolConfig, run_pending_migrations,
};
use food_api::settings::AppSettings;

use server::{ServerConfig, create_server};

fn fatal(context: &str, err: impl Display) -> std::io::Error {
    std::io::Error::other(format!("{context}: {err}"))
}

/// Run every start-up step that must succeed before the listener binds.
async fn bootstrap(settings: &AppSettings) -> std::io::Result<ServerConfig> {
    let bind_addr = settings.bind_addr().map_err(|e| fatal("invalid settings", e))?;
    let database_url = settings
        .database_url()
        .map_err(|e| fatal("invalid settings", e))?;
    let ttl_hours = settings
        .token_ttl_hours()
        .map_err(|e| fatal("invalid settings", e))?;
    let validity = TimeDelta::try_hours(ttl_hours).ok_or_else(|| {
        fatal(
            "invalid settings",
            format!("token_ttl_hours {ttl_hours} out of range"),
        )
    })?;

    let key_store = FileKeyStore::new(
        settings.key_dir(),
        settings.private_key_file(),
        settings.public_key_file(),
    );
    let keys = key_store
        .load_or_generate()
        .map_err(|e| fatal("failed to load signing keys", e))?;
    info!(
        fingerprint = %keys.fingerprint,
        generated = keys.generated,
        public_key = %key_store.public_key_path().display(),
        "signing keys ready"
    );

    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(settings.pool_max_size()))
        .await
        .map_err(|e| fatal("failed to connect to the database", e))?;
    let applied = run_pending_migrations(database_url)
        .await
        .map_err(|e| fatal("failed to apply migrations", e))?;
    info!(applied, "database schema up to date");

    let users = DieselUserRepository::new(pool.clone());
    if let Some(credentials) = ensure_initial_user(&users)
        .await
        .map_err(|e| fatal("failed to create the initial account", e))?
    {
        warn!(
            name = %credentials.name,
            password = %credentials.password.as_str(),
            "created initial account; log in and change this password now"
        );
    }

    let tokens = TokenService::new(Arc::new(keys.signing), Arc::new(DefaultClock))
        .with_validity(validity);
    Ok(ServerConfig::new(bind_addr, pool, tokens))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| fatal("failed to load settings", e))?;
    let config = bootstrap(&settings).await?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}
