// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Mock collection API for testing.
//!
//! An in-memory backend that hands out sequential uids, records every call,
//! and can be told to fail any stage.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::traits::*;
use crate::error::{ConvertError, Result, Stage};

/// A call observed by the mock, in issue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    /// `create_collection` with the raw collection JSON.
    Create(String),
    /// `transform_collection` for a uid.
    Transform(CollectionUid),
    /// `delete_collection` for a uid.
    Delete(CollectionUid),
}

/// How a stage should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    /// Behave like a connection error.
    Transport,
    /// Behave like the remote API returning this status.
    Status(u16),
    /// Behave like an unusable response body.
    Malformed,
    /// Panic inside the call.
    Panic,
}

impl MockFailure {
    fn into_error(self, stage: Stage) -> ConvertError {
        match self {
            Self::Transport => ConvertError::UpstreamCallFailed {
                stage,
                message: "mock connection refused".to_string(),
            },
            Self::Status(status) => ConvertError::UpstreamRejected { stage, status },
            Self::Malformed => ConvertError::malformed(stage, "mock malformed body"),
            Self::Panic => panic!("mock {} panicked", stage),
        }
    }
}

/// Mock collection API for testing.
pub struct MockCollectionApi {
    calls: Mutex<Vec<MockCall>>,
    next_uid: AtomicU64,
    failures: HashMap<Stage, MockFailure>,
    transform_delay: Option<Duration>,
    /// Text returned by a successful transform.
    pub output: String,
}

impl Default for MockCollectionApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCollectionApi {
    /// Create a mock where every call succeeds.
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            next_uid: AtomicU64::new(1),
            failures: HashMap::new(),
            transform_delay: None,
            output: "openapi: 3.0.0\n".to_string(),
        }
    }

    /// Set the transform output.
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }

    /// Sleep this long inside every transform call.
    pub fn with_transform_delay(mut self, delay: Duration) -> Self {
        self.transform_delay = Some(delay);
        self
    }

    /// Make one stage fail on every call.
    pub fn failing_at(mut self, stage: Stage, failure: MockFailure) -> Self {
        self.failures.insert(stage, failure);
        self
    }

    /// All calls seen so far.
    pub async fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().await.clone()
    }

    /// Uids passed to `delete_collection`, in order.
    pub async fn deleted(&self) -> Vec<CollectionUid> {
        self.calls
            .lock()
            .await
            .iter()
            .filter_map(|call| match call {
                MockCall::Delete(uid) => Some(uid.clone()),
                _ => None,
            })
            .collect()
    }

    async fn record(&self, call: MockCall) {
        self.calls.lock().await.push(call);
    }

    fn check(&self, stage: Stage) -> Result<()> {
        match self.failures.get(&stage) {
            Some(failure) => Err(failure.into_error(stage)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CollectionApi for MockCollectionApi {
    fn backend_name(&self) -> &'static str {
        "mock"
    }

    async fn create_collection(&self, collection_json: &str) -> Result<CollectionUid> {
        self.record(MockCall::Create(collection_json.to_string()))
            .await;
        self.check(Stage::Create)?;

        let n = self.next_uid.fetch_add(1, Ordering::SeqCst);
        Ok(CollectionUid::from(format!("mock-{}", n)))
    }

    async fn transform_collection(&self, uid: &CollectionUid) -> Result<String> {
        self.record(MockCall::Transform(uid.clone())).await;
        if let Some(delay) = self.transform_delay {
            tokio::time::sleep(delay).await;
        }
        self.check(Stage::Transform)?;
        Ok(self.output.clone())
    }

    async fn delete_collection(&self, uid: &CollectionUid) -> Result<()> {
        self.record(MockCall::Delete(uid.clone())).await;
        self.check(Stage::Delete)
    }
}
