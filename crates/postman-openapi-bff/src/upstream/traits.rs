// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Collection API trait definitions.
//!
//! Defines the abstract interface for the remote collection-management API.

use std::fmt;

use async_trait::async_trait;

use crate::error::Result;

/// Identifier the remote API assigns to a created collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionUid(String);

impl CollectionUid {
    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CollectionUid {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for CollectionUid {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Trait for collection API backends.
///
/// A backend performs exactly one remote call per method. It does not retry
/// and it does not clean up after itself; sequencing and cleanup belong to
/// [`crate::converter::Converter`].
#[async_trait]
pub trait CollectionApi: Send + Sync {
    /// Backend identifier (e.g., "postman", "mock")
    fn backend_name(&self) -> &'static str;

    /// Create a temporary collection from raw collection JSON.
    async fn create_collection(&self, collection_json: &str) -> Result<CollectionUid>;

    /// Ask the remote API to transform a collection into an OpenAPI document.
    async fn transform_collection(&self, uid: &CollectionUid) -> Result<String>;

    /// Delete a collection.
    async fn delete_collection(&self, uid: &CollectionUid) -> Result<()>;
}
