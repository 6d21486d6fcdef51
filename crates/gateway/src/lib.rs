//! API Gateway Library
//!
//! This crate provides the HTTP REST API in front of the authentication
//! issuer, which it embeds in-process.

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use std::net::SocketAddr;

use tracing::info;

use auth_service_lib::config::AuthServiceConfig;
use auth_service_lib::AuthComponents;

use crate::config::GatewayConfig;
use crate::routes::create_router;
use crate::state::AppState;

/// Run the HTTP server. Arguments override `GATEWAY_HOST`/`GATEWAY_PORT`.
pub async fn run(host: Option<String>, port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let auth_config = AuthServiceConfig::from_env()?;
    let mut config = GatewayConfig::from_env()?;
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    run_server_with_config(auth_config, config).await
}

/// Run the HTTP server with the given configuration.
async fn run_server_with_config(
    auth_config: AuthServiceConfig,
    config: GatewayConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(?auth_config, "Starting authentication issuer");
    let components = AuthComponents::connect(&auth_config).await?;

    // Build address
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    // Build router
    let app = create_router(AppState::new(components, config));

    info!("Gateway listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
