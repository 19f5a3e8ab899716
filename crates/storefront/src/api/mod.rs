//! Storefront REST API client.
//!
//! # Architecture
//!
//! - Plain JSON over HTTP with `reqwest`; every response is wrapped in a
//!   `{ "data": ... }` envelope and errors in `{ "error": { code, message } }`
//! - The backend is the source of truth: pricing, stock, carts and orders are
//!   never computed locally
//! - Public, slow-changing reads (storefront config, carousels, categories,
//!   product listings) are cached in memory via `moka`; carts, orders,
//!   checkout and auth are never cached
//!
//! # Identity
//!
//! A client is anonymous by default. [`ApiClient::with_token`] and
//! [`ApiClient::with_session`] return views of the same client (shared HTTP
//! pool and cache) that send `Authorization: Bearer` and `x-session-id`.
//!
//! # Example
//!
//! ```rust,ignore
//! use vitrina_storefront::api::ApiClient;
//!
//! let client = ApiClient::new(&config.api)?;
//!
//! // Browse
//! let carousels = client.storefront_carousels().await?;
//!
//! // Guest cart
//! let guest = client.with_session(Some(session_id));
//! let cart = guest.add_cart_item(&product_id, Some(1)).await?;
//! ```

mod auth;
mod cache;
mod cart;
mod catalog;
mod client;
mod orders;
mod storefront;
pub mod types;

pub use client::{ApiClient, Identity, REQUEST_ID_HEADER, SESSION_HEADER};
pub use types::*;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when talking to the storefront API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error {status} ({code}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Machine-readable error code from the error envelope.
        code: String,
        /// Human-readable message from the error envelope.
        message: String,
    },

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The API returned no content where a body was expected.
    #[error("Empty response body from {0}")]
    EmptyBody(String),
}

impl ApiError {
    /// HTTP status of an API-level error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::RateLimited(_) => Some(429),
            _ => None,
        }
    }

    /// Whether the API reported the resource as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.status(), Some(404))
    }

    /// Whether the request itself was rejected (4xx other than rate limiting).
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status >= 400 && *status < 500)
    }

    /// Build an error from a non-success response body.
    ///
    /// Falls back to `HTTP_ERROR` / `HTTP Error: <status>` when the body is
    /// not the API's error envelope.
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        let envelope = serde_json::from_str::<ErrorEnvelope>(body).ok();
        let (code, message) = envelope.map_or((None, None), |e| (e.error.code, e.error.message));

        Self::Api {
            status,
            code: code
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| "HTTP_ERROR".to_string()),
            message: message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| format!("HTTP Error: {status}")),
        }
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
}
