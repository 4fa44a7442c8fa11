// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Postman API backend.
//!
//! Talks to the Postman collection API over HTTP:
//!
//! | Operation | Request | Success |
//! |-----------|---------|---------|
//! | create | `POST {base}/collections` | 200/201, `{"collection": {"uid": ...}}` |
//! | transform | `GET {base}/collections/{uid}/transformations` | 200, `{"output": ...}` |
//! | delete | `DELETE {base}/collections/{uid}` | 200 |
//!
//! Every request carries the `X-Api-Key` header. The uid is percent-encoded
//! into a single path segment.

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use tracing::debug;
use urlencoding::encode;

use super::traits::*;
use crate::config::Config;
use crate::error::{ConvertError, Result, Stage};

/// Header carrying the Postman API key.
pub const API_KEY_HEADER: &str = "X-Api-Key";

#[derive(Debug, Deserialize)]
struct CreateCollectionResponse {
    collection: CreatedCollection,
}

#[derive(Debug, Deserialize)]
struct CreatedCollection {
    uid: String,
}

#[derive(Debug, Deserialize)]
struct TransformationResponse {
    output: String,
}

/// Collection API backed by the Postman REST API.
#[derive(Clone)]
pub struct PostmanClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for PostmanClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostmanClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl PostmanClient {
    /// Create a client with a fresh connection pool.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self::with_client(http, base_url, api_key))
    }

    /// Create a client on top of an existing `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            api_key: api_key.into(),
        }
    }

    /// Create a client from service configuration.
    pub fn from_config(config: &Config) -> reqwest::Result<Self> {
        Self::new(config.api_base_url.clone(), config.api_key.clone())
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collections_url(&self) -> String {
        format!("{}/collections", self.base_url)
    }

    fn collection_url(&self, uid: &CollectionUid) -> String {
        format!("{}/collections/{}", self.base_url, encode(uid.as_str()))
    }

    fn transformations_url(&self, uid: &CollectionUid) -> String {
        format!(
            "{}/collections/{}/transformations",
            self.base_url,
            encode(uid.as_str())
        )
    }
}

fn call_failed(stage: Stage, err: reqwest::Error) -> ConvertError {
    ConvertError::UpstreamCallFailed {
        stage,
        message: err.to_string(),
    }
}

fn rejected(stage: Stage, status: StatusCode) -> ConvertError {
    ConvertError::UpstreamRejected {
        stage,
        status: status.as_u16(),
    }
}

fn parse_created_uid(body: &str) -> Result<CollectionUid> {
    let parsed: CreateCollectionResponse = serde_json::from_str(body)
        .map_err(|e| ConvertError::malformed(Stage::Create, e.to_string()))?;

    let uid = parsed.collection.uid;
    if uid.trim().is_empty() {
        return Err(ConvertError::malformed(
            Stage::Create,
            "'collection.uid' is empty",
        ));
    }
    // Dot segments are resolved by URL parsing even when percent-encoded
    if matches!(uid.as_str(), "." | "..") {
        return Err(ConvertError::malformed(
            Stage::Create,
            format!("'collection.uid' {:?} cannot be addressed", uid),
        ));
    }

    Ok(CollectionUid::from(uid))
}

fn parse_transformation_output(body: &str) -> Result<String> {
    let parsed: TransformationResponse = serde_json::from_str(body)
        .map_err(|e| ConvertError::malformed(Stage::Transform, e.to_string()))?;
    Ok(parsed.output)
}

#[async_trait]
impl CollectionApi for PostmanClient {
    fn backend_name(&self) -> &'static str {
        "postman"
    }

    async fn create_collection(&self, collection_json: &str) -> Result<CollectionUid> {
        let response = self
            .http
            .post(self.collections_url())
            .header(API_KEY_HEADER, &self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .body(collection_json.to_owned())
            .send()
            .await
            .map_err(|e| call_failed(Stage::Create, e))?;

        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            return Err(rejected(Stage::Create, status));
        }

        let body = response
            .text()
            .await
            .map_err(|e| call_failed(Stage::Create, e))?;
        let uid = parse_created_uid(&body)?;

        debug!(uid = %uid, status = status.as_u16(), "Collection created");
        Ok(uid)
    }

    async fn transform_collection(&self, uid: &CollectionUid) -> Result<String> {
        let response = self
            .http
            .get(self.transformations_url(uid))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| call_failed(Stage::Transform, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(rejected(Stage::Transform, status));
        }

        let body = response
            .text()
            .await
            .map_err(|e| call_failed(Stage::Transform, e))?;
        let output = parse_transformation_output(&body)?;

        debug!(uid = %uid, output_len = output.len(), "Collection transformed");
        Ok(output)
    }

    async fn delete_collection(&self, uid: &CollectionUid) -> Result<()> {
        let response = self
            .http
            .delete(self.collection_url(uid))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| call_failed(Stage::Delete, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(rejected(Stage::Delete, status));
        }

        debug!(uid = %uid, "Collection deleted");
        Ok(())
    }
}
