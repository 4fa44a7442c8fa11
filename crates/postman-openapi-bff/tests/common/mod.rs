// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Common test infrastructure for postman-openapi-bff integration tests.
//!
//! Builds routers over a chosen backend and sends requests through them
//! without binding a port.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use postman_openapi_bff::converter::Converter;
use postman_openapi_bff::server::{self, AppState};
use postman_openapi_bff::upstream::CollectionApi;

pub const TEST_ORIGIN: &str = "http://localhost:4200";

/// Build the full router over a backend.
pub fn app_with(api: Arc<dyn CollectionApi>) -> Router {
    let converter = Arc::new(Converter::new(api));
    let cors = server::cors_layer(TEST_ORIGIN).expect("valid test origin");
    server::router(AppState::new(converter), cors)
}

/// Response status and body text.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("response body is JSON")
    }
}

/// POST a raw body to the convert endpoint.
pub async fn post_convert_raw(app: Router, body: String) -> TestResponse {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/postman/convert")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    TestResponse {
        status,
        body: String::from_utf8_lossy(&bytes).to_string(),
    }
}

/// POST a collection document to the convert endpoint.
pub async fn post_convert(app: Router, collection_json: &str) -> TestResponse {
    let body = serde_json::json!({ "collectionJson": collection_json }).to_string();
    post_convert_raw(app, body).await
}
