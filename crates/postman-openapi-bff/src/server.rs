// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! HTTP API for the converter.
//!
//! | Method | Path | Body | Response |
//! |--------|------|------|----------|
//! | `POST` | `/api/postman/convert` | `{"collectionJson": "..."}` | `{"openApiSpec": "..."}` |
//! | `GET` | `/health` | - | `{"status": "ok", ...}` |
//!
//! Failed conversions answer with the error message as plain text and the
//! status from [`ConvertError::status_code`].

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::header::InvalidHeaderValue;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::converter::Converter;
use crate::error::ConvertError;

/// Shared state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Conversion orchestrator shared by all requests.
    pub converter: Arc<Converter>,
    /// Server version string.
    pub version: &'static str,
}

impl AppState {
    /// Create handler state around a converter.
    pub fn new(converter: Arc<Converter>) -> Self {
        Self {
            converter,
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Body of `POST /api/postman/convert`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertRequest {
    /// Postman collection as JSON text.
    pub collection_json: String,
}

/// Successful response of `POST /api/postman/convert`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertResponse {
    /// OpenAPI document produced by the Postman API.
    pub open_api_spec: String,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "ok".
    pub status: String,
    /// Server version.
    pub version: String,
    /// Collection API backend in use.
    pub backend: String,
}

impl IntoResponse for ConvertError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, self.to_string()).into_response()
    }
}

/// Build a CORS layer allowing one origin.
pub fn cors_layer(origin: &str) -> Result<CorsLayer, InvalidHeaderValue> {
    Ok(CorsLayer::new()
        .allow_origin(HeaderValue::from_str(origin)?)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any))
}

/// Build the router with all routes and layers.
pub fn router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/api/postman/convert", post(convert))
        .route("/health", get(health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the router until `shutdown` resolves.
pub async fn serve(
    addr: SocketAddr,
    app: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

/// POST /api/postman/convert
async fn convert(
    State(state): State<AppState>,
    Json(request): Json<ConvertRequest>,
) -> Result<Json<ConvertResponse>, ConvertError> {
    let open_api_spec = state
        .converter
        .clone()
        .spawn_convert(request.collection_json)
        .await?;

    Ok(Json(ConvertResponse { open_api_spec }))
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: state.version.to_string(),
        backend: state.converter.backend_name().to_string(),
    })
}
