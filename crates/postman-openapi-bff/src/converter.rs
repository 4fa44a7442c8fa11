// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Collection to OpenAPI conversion.
//!
//! A conversion is three remote calls in a fixed order:
//!
//! ```text
//!   create ──ok──▶ transform ──ok/err──▶ delete ──▶ result of transform
//!     │
//!    err
//!     ▼
//!   result of create (no transform, no delete)
//! ```
//!
//! Once create has returned a uid, delete is always attempted. A failed
//! delete is logged and never changes the result seen by the caller.

use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinError;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use crate::error::{ConvertError, Result, Stage};
use crate::upstream::{CollectionApi, CollectionUid};

/// Conversion orchestrator.
///
/// Holds no per-request state; one instance is shared by all requests.
pub struct Converter {
    api: Arc<dyn CollectionApi>,
    tasks: TaskTracker,
}

impl Converter {
    /// Create a converter on top of a collection API backend.
    pub fn new(api: Arc<dyn CollectionApi>) -> Self {
        Self {
            api,
            tasks: TaskTracker::new(),
        }
    }

    /// Name of the backend in use.
    pub fn backend_name(&self) -> &'static str {
        self.api.backend_name()
    }

    /// Convert a collection document into OpenAPI text.
    pub async fn convert(&self, collection_json: &str) -> Result<String> {
        info!(
            backend = self.api.backend_name(),
            input_len = collection_json.len(),
            "Starting collection conversion"
        );

        let uid = match self.api.create_collection(collection_json).await {
            Ok(uid) => uid,
            Err(e) => {
                warn!(stage = %Stage::Create, error = %e, "Conversion failed");
                return Err(e);
            }
        };

        let api = Arc::clone(&self.api);
        let transform_uid = uid.clone();
        let result = isolated("transform", async move {
            api.transform_collection(&transform_uid).await
        })
        .await;

        self.cleanup(&uid).await;

        match &result {
            Ok(spec) => info!(uid = %uid, spec_len = spec.len(), "Conversion completed"),
            Err(e) => warn!(uid = %uid, stage = %Stage::Transform, error = %e, "Conversion failed"),
        }

        result
    }

    /// Run [`Converter::convert`] on its own task and wait for it.
    ///
    /// The task keeps running if the awaiting future is dropped, so a caller
    /// that goes away between create and delete still gets its collection
    /// deleted, as long as the process waits in [`Converter::shutdown`]
    /// before exiting.
    pub async fn spawn_convert(self: Arc<Self>, collection_json: String) -> Result<String> {
        let this = Arc::clone(&self);
        self.tasks
            .spawn(async move { this.convert(&collection_json).await })
            .await
            .unwrap_or_else(|e| Err(join_error("conversion", e)))
    }

    /// Wait for every conversion started by [`Converter::spawn_convert`].
    pub async fn shutdown(&self) {
        self.tasks.close();
        if !self.tasks.is_empty() {
            info!(in_flight = self.tasks.len(), "Waiting for conversions to finish");
        }
        self.tasks.wait().await;
    }

    async fn cleanup(&self, uid: &CollectionUid) {
        let api = Arc::clone(&self.api);
        let delete_uid = uid.clone();
        let outcome = isolated("delete", async move {
            api.delete_collection(&delete_uid).await
        })
        .await;

        match outcome {
            Ok(()) => debug!(uid = %uid, "Temporary collection deleted"),
            Err(e) => {
                let err = ConvertError::CleanupFailed {
                    uid: uid.clone(),
                    source: Box::new(e),
                };
                error!(
                    uid = %uid,
                    error_code = err.error_code(),
                    error = %err,
                    "Temporary collection was not deleted"
                );
            }
        }
    }
}

/// Run a future on its own task so a panic inside it becomes an error.
async fn isolated<T, F>(what: &'static str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(fut)
        .await
        .unwrap_or_else(|e| Err(join_error(what, e)))
}

fn join_error(what: &str, err: JoinError) -> ConvertError {
    if !err.is_panic() {
        return ConvertError::InternalUnexpected(format!("{} task was cancelled", what));
    }

    let payload = err.into_panic();
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());

    ConvertError::InternalUnexpected(format!("{} task panicked: {}", what, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::mock::{MockCall, MockFailure};
    use crate::upstream::MockCollectionApi;

    fn converter(api: &Arc<MockCollectionApi>) -> Converter {
        Converter::new(api.clone())
    }

    #[tokio::test]
    async fn test_convert_success_deletes_collection() {
        let api = Arc::new(MockCollectionApi::new().with_output("openapi: 3.0.0..."));

        let spec = converter(&api)
            .convert(r#"{"info":{"name":"Test"}}"#)
            .await
            .unwrap();

        assert_eq!(spec, "openapi: 3.0.0...");
        assert_eq!(
            api.calls().await,
            vec![
                MockCall::Create(r#"{"info":{"name":"Test"}}"#.to_string()),
                MockCall::Transform(CollectionUid::from("mock-1")),
                MockCall::Delete(CollectionUid::from("mock-1")),
            ]
        );
    }

    #[tokio::test]
    async fn test_create_failure_skips_transform_and_delete() {
        for failure in [MockFailure::Transport, MockFailure::Status(401)] {
            let api = Arc::new(MockCollectionApi::new().failing_at(Stage::Create, failure));

            let err = converter(&api).convert("{}").await.unwrap_err();

            assert_eq!(err.stage(), Some(Stage::Create));
            assert_eq!(api.calls().await.len(), 1, "only the create call is issued");
            assert!(api.deleted().await.is_empty());
        }
    }

    #[tokio::test]
    async fn test_transform_failure_still_deletes() {
        let api = Arc::new(
            MockCollectionApi::new().failing_at(Stage::Transform, MockFailure::Status(404)),
        );

        let err = converter(&api).convert("{}").await.unwrap_err();

        assert!(matches!(
            err,
            ConvertError::UpstreamRejected {
                stage: Stage::Transform,
                status: 404
            }
        ));
        assert_eq!(err.status_code(), 404);
        assert_eq!(api.deleted().await, vec![CollectionUid::from("mock-1")]);
    }

    #[tokio::test]
    async fn test_malformed_transform_is_internal() {
        let api = Arc::new(
            MockCollectionApi::new().failing_at(Stage::Transform, MockFailure::Malformed),
        );

        let err = converter(&api).convert("{}").await.unwrap_err();

        assert_eq!(err.error_code(), "UPSTREAM_RESPONSE_MALFORMED");
        assert_eq!(err.status_code(), 500);
        assert_eq!(api.deleted().await.len(), 1);
    }

    #[tokio::test]
    async fn test_transform_and_delete_both_fail_reports_transform() {
        let api = Arc::new(
            MockCollectionApi::new()
                .failing_at(Stage::Transform, MockFailure::Transport)
                .failing_at(Stage::Delete, MockFailure::Status(500)),
        );

        let err = converter(&api).convert("{}").await.unwrap_err();

        assert_eq!(err.stage(), Some(Stage::Transform));
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_delete_failure_does_not_mask_success() {
        for failure in [
            MockFailure::Transport,
            MockFailure::Status(500),
            MockFailure::Panic,
        ] {
            let api = Arc::new(MockCollectionApi::new().failing_at(Stage::Delete, failure));

            let spec = converter(&api).convert("{}").await.unwrap();

            assert_eq!(spec, "openapi: 3.0.0\n");
            assert_eq!(api.deleted().await.len(), 1);
        }
    }

    #[tokio::test]
    async fn test_transform_panic_still_deletes() {
        let api =
            Arc::new(MockCollectionApi::new().failing_at(Stage::Transform, MockFailure::Panic));

        let err = converter(&api).convert("{}").await.unwrap_err();

        assert!(matches!(err, ConvertError::InternalUnexpected(_)));
        assert!(err.to_string().starts_with("An unexpected error occurred"));
        assert!(err.to_string().contains("mock transform panicked"));
        assert_eq!(api.deleted().await, vec![CollectionUid::from("mock-1")]);
    }

    #[tokio::test]
    async fn test_repeated_conversions_are_independent() {
        let api = Arc::new(MockCollectionApi::new());
        let converter = converter(&api);

        converter.convert("{}").await.unwrap();
        converter.convert("{}").await.unwrap();

        assert_eq!(
            api.deleted().await,
            vec![CollectionUid::from("mock-1"), CollectionUid::from("mock-2")]
        );
    }

    #[tokio::test]
    async fn test_spawn_convert_maps_create_panic() {
        let api = Arc::new(MockCollectionApi::new().failing_at(Stage::Create, MockFailure::Panic));
        let converter = Arc::new(converter(&api));

        let err = converter.spawn_convert("{}".to_string()).await.unwrap_err();

        assert!(matches!(err, ConvertError::InternalUnexpected(_)));
        assert!(api.deleted().await.is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_waits_for_abandoned_conversion() {
        let api = Arc::new(
            MockCollectionApi::new().with_transform_delay(std::time::Duration::from_millis(50)),
        );
        let converter = Arc::new(converter(&api));

        let caller = tokio::spawn(Arc::clone(&converter).spawn_convert("{}".to_string()));
        while api.calls().await.is_empty() {
            tokio::task::yield_now().await;
        }
        caller.abort();
        converter.shutdown().await;

        assert_eq!(api.deleted().await, vec![CollectionUid::from("mock-1")]);
    }

    #[tokio::test]
    async fn test_spawn_convert_success() {
        let api = Arc::new(MockCollectionApi::new());
        let converter = Arc::new(converter(&api));

        let spec = converter.spawn_convert("{}".to_string()).await.unwrap();

        assert_eq!(spec, "openapi: 3.0.0\n");
        assert_eq!(api.deleted().await.len(), 1);
    }
}
