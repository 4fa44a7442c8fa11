// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Postman OpenAPI BFF server
//!
//! Serves `POST /api/postman/convert`, which turns a Postman collection into
//! an OpenAPI document through the Postman API.

use std::sync::Arc;

use tracing::{error, info, warn};

use postman_openapi_bff::config::Config;
use postman_openapi_bff::converter::Converter;
use postman_openapi_bff::server::{self, AppState};
use postman_openapi_bff::upstream::PostmanClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before logging so RUST_LOG can come from it)
    let dotenv = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "postman_openapi_bff=info,tower_http=info".into()),
        )
        .init();

    if let Err(e) = dotenv {
        warn!("No .env file loaded: {}", e);
    }

    let config = Config::from_env().map_err(|e| {
        error!("Configuration error: {}", e);
        e
    })?;

    info!(
        http_addr = %config.http_addr,
        api_base_url = %config.api_base_url,
        cors_origin = %config.cors_origin,
        "Starting Postman OpenAPI BFF"
    );

    let client = PostmanClient::from_config(&config)?;
    let converter = Arc::new(Converter::new(Arc::new(client)));

    let cors = server::cors_layer(&config.cors_origin)?;
    let app = server::router(AppState::new(Arc::clone(&converter)), cors);

    server::serve(config.http_addr, app, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
        }
        info!("Shutdown signal received");
    })
    .await?;

    converter.shutdown().await;

    info!("Postman OpenAPI BFF shut down");

    Ok(())
}
