// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Postman OpenAPI BFF - Collection Conversion Service
//!
//! This crate converts Postman collections into OpenAPI documents by
//! delegating to the Postman API. It exposes one conversion endpoint to a
//! browser frontend.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │  Frontend (browser)  │
//! └──────────┬───────────┘
//!            │ POST /api/postman/convert
//!            ▼
//! ┌──────────────────────────────────────────────────────┐
//! │              postman-openapi-bff (This Crate)         │
//! │  ┌────────────┐   ┌─────────────┐   ┌──────────────┐  │
//! │  │   server   │──▶│  converter  │──▶│   upstream   │  │
//! │  │   (axum)   │   │ create/xform│   │  (reqwest)   │  │
//! │  └────────────┘   │   /delete   │   └──────┬───────┘  │
//! │                   └─────────────┘          │          │
//! └────────────────────────────────────────────┼──────────┘
//!                                              ▼
//!                                   ┌─────────────────────┐
//!                                   │     Postman API     │
//!                                   └─────────────────────┘
//! ```
//!
//! # Conversion
//!
//! | Step | Remote call | On failure |
//! |------|-------------|------------|
//! | 1 | `POST /collections` | return the error |
//! | 2 | `GET /collections/{uid}/transformations` | delete, then return the error |
//! | 3 | `DELETE /collections/{uid}` | log only |
//!
//! # Configuration
//!
//! Configuration is loaded from environment variables:
//!
//! | Variable | Required | Default | Description |
//! |----------|----------|---------|-------------|
//! | `POSTMAN_API_KEY` | Yes | - | Postman API key |
//! | `POSTMAN_API_BASE_URL` | No | `https://api.getpostman.com` | Postman API base URL |
//! | `POSTMAN_OPENAPI_PORT` | No | `8080` | HTTP port |
//! | `POSTMAN_OPENAPI_CORS_ORIGIN` | No | `http://localhost:4200` | Allowed CORS origin |
//!
//! # Modules
//!
//! - [`config`]: Server configuration from environment variables
//! - [`converter`]: The create → transform → delete orchestration
//! - [`error`]: Error types and their HTTP status mapping
//! - [`server`]: axum router and handlers
//! - [`upstream`]: Collection API backends (Postman, mock)

#![deny(missing_docs)]

/// Server configuration loaded from environment variables.
pub mod config;

/// Collection to OpenAPI conversion.
pub mod converter;

/// Error types for conversions.
pub mod error;

/// HTTP API.
pub mod server;

/// Collection API backends.
pub mod upstream;

pub use config::Config;
pub use converter::Converter;
pub use error::{ConvertError, Stage};
