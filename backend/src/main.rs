//! Backend entry-point: wires REST endpoints and OpenAPI docs.

mod server;

use std::env;
use std::net::SocketAddr;

use actix_web::web;
use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::inbound::http::token_config::{BuildMode, token_settings_from_env};
use server::{ServerConfig, create_server};

const DEFAULT_STORE_PATH: &str = "data/store.json";

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

    let settings = token_settings_from_env(&DefaultEnv, BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    info!(key_fingerprint = %settings.key_fingerprint, "token signing key loaded");

    let store_path = env::var("STORE_PATH").unwrap_or_else(|_| DEFAULT_STORE_PATH.into());
    let bind_addr = SocketAddr::from(([0, 0, 0, 0], 8080));
    let config = ServerConfig::new(settings.signer, bind_addr).with_store_path(store_path);

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
