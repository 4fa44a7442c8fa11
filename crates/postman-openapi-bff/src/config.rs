// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration loading from environment variables.

use std::net::SocketAddr;

/// Default Postman API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api.getpostman.com";

/// Default origin allowed by CORS (the frontend dev server).
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:4200";

/// Service configuration.
#[derive(Clone)]
pub struct Config {
    /// Postman API key sent as `X-Api-Key`
    pub api_key: String,
    /// Postman API base URL
    pub api_base_url: String,
    /// HTTP listen address
    pub http_addr: SocketAddr,
    /// Origin allowed to call the API from a browser
    pub cors_origin: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("http_addr", &self.http_addr)
            .field("cors_origin", &self.cors_origin)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `POSTMAN_API_KEY`: Postman API key
    ///
    /// Optional (with defaults):
    /// - `POSTMAN_API_BASE_URL`: Postman API base URL (default: https://api.getpostman.com)
    /// - `POSTMAN_OPENAPI_PORT`: HTTP port (default: 8080)
    /// - `POSTMAN_OPENAPI_CORS_ORIGIN`: allowed CORS origin (default: http://localhost:4200)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("POSTMAN_API_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("POSTMAN_API_KEY"))?;

        let api_base_url = std::env::var("POSTMAN_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(ConfigError::Invalid(
                "POSTMAN_API_BASE_URL",
                "must start with http:// or https://",
            ));
        }

        let port: u16 = std::env::var("POSTMAN_OPENAPI_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| {
                ConfigError::Invalid("POSTMAN_OPENAPI_PORT", "must be a valid port number")
            })?;

        let cors_origin = std::env::var("POSTMAN_OPENAPI_CORS_ORIGIN")
            .unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.to_string());

        Ok(Self {
            api_key,
            api_base_url,
            http_addr: SocketAddr::from(([0, 0, 0, 0], port)),
            cors_origin,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),

    /// An environment variable has an invalid value.
    #[error("invalid value for {0}: {1}")]
    Invalid(&'static str, &'static str),
}
