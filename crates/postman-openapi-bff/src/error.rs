// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for postman-openapi-bff.
//!
//! Every failure of a conversion is one [`ConvertError`] variant. The HTTP
//! layer turns it into a status code and a plain-text body via
//! [`ConvertError::status_code`].

use std::fmt;

use thiserror::Error;

use crate::upstream::CollectionUid;

/// Result type using ConvertError.
pub type Result<T> = std::result::Result<T, ConvertError>;

/// The remote call a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// `POST /collections`
    Create,
    /// `GET /collections/{uid}/transformations`
    Transform,
    /// `DELETE /collections/{uid}`
    Delete,
}

impl Stage {
    /// Lowercase name used in log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Transform => "transform",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conversion errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConvertError {
    /// The request to the Postman API could not be completed (connect, timeout, I/O).
    #[error("Failed to {stage} collection: {message}")]
    UpstreamCallFailed {
        /// Stage that failed.
        stage: Stage,
        /// Transport error details.
        message: String,
    },

    /// The Postman API answered with a non-success status.
    #[error("Request to {stage} collection failed with status: {status}")]
    UpstreamRejected {
        /// Stage that failed.
        stage: Stage,
        /// Status code returned by the Postman API.
        status: u16,
    },

    /// The Postman API answered with a body we could not use.
    #[error("Error parsing {stage} response: {message}")]
    UpstreamResponseMalformed {
        /// Stage that failed.
        stage: Stage,
        /// What was wrong with the body.
        message: String,
    },

    /// Deleting the temporary collection failed. Logged, never returned to callers.
    #[error("Failed to delete collection '{uid}': {source}")]
    CleanupFailed {
        /// Collection that could not be deleted.
        uid: CollectionUid,
        /// Underlying delete error.
        #[source]
        source: Box<ConvertError>,
    },

    /// Anything else that went wrong during the conversion.
    #[error("An unexpected error occurred: {0}")]
    InternalUnexpected(String),
}

impl ConvertError {
    /// Build a malformed-response error.
    pub fn malformed(stage: Stage, message: impl Into<String>) -> Self {
        Self::UpstreamResponseMalformed {
            stage,
            message: message.into(),
        }
    }

    /// HTTP status the caller should see for this error.
    ///
    /// Transport failures are 400. Rejections reuse the Postman status when it
    /// is a client or server error; anything else is 500.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::UpstreamCallFailed { .. } => 400,
            Self::UpstreamRejected { status, .. } if (400..=599).contains(status) => *status,
            Self::UpstreamRejected { .. } => 500,
            Self::UpstreamResponseMalformed { .. } => 500,
            Self::CleanupFailed { .. } => 500,
            Self::InternalUnexpected(_) => 500,
        }
    }

    /// Stable error code string for this error type.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UpstreamCallFailed { .. } => "UPSTREAM_CALL_FAILED",
            Self::UpstreamRejected { .. } => "UPSTREAM_REJECTED",
            Self::UpstreamResponseMalformed { .. } => "UPSTREAM_RESPONSE_MALFORMED",
            Self::CleanupFailed { .. } => "CLEANUP_FAILED",
            Self::InternalUnexpected(_) => "INTERNAL_UNEXPECTED",
        }
    }

    /// Stage the error belongs to, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::UpstreamCallFailed { stage, .. }
            | Self::UpstreamRejected { stage, .. }
            | Self::UpstreamResponseMalformed { stage, .. } => Some(*stage),
            Self::CleanupFailed { .. } => Some(Stage::Delete),
            Self::InternalUnexpected(_) => None,
        }
    }
}
