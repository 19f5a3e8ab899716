//! HTTP plumbing shared by every endpoint group.

use std::sync::Arc;

use moka::future::Cache;
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use vitrina_core::SessionId;

use super::ApiError;
use super::cache::{CacheKey, CacheValue, TtlPolicy};
use super::types::ApiResponse;
use crate::config::ApiConfig;

/// Header carrying the guest session identifier.
pub const SESSION_HEADER: &str = "x-session-id";

/// Header carrying a per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Who a request is made on behalf of.
///
/// Implements `Debug` manually to redact the bearer token.
#[derive(Clone, Default)]
pub struct Identity {
    token: Option<SecretString>,
    session_id: Option<SessionId>,
}

impl Identity {
    /// No token, no guest session.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Bearer token, if authenticated.
    #[must_use]
    pub const fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }

    /// Guest session identifier, if any.
    #[must_use]
    pub const fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    /// Whether requests carry a bearer token.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("session_id", &self.session_id)
            .finish()
    }
}

/// Client for the storefront REST API.
///
/// Cheap to clone; clones and identity views share one connection pool and
/// one response cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
    identity: Identity,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        let cache = Cache::builder()
            .max_capacity(500)
            .expire_after(TtlPolicy)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                cache,
            }),
            identity: Identity::anonymous(),
        })
    }

    /// The identity requests are sent with.
    #[must_use]
    pub const fn identity(&self) -> &Identity {
        &self.identity
    }

    /// A view of this client that authenticates with `token`.
    #[must_use]
    pub fn with_token(&self, token: SecretString) -> Self {
        let mut view = self.clone();
        view.identity.token = Some(token);
        view
    }

    /// A view of this client that sends (or stops sending) a guest session id.
    #[must_use]
    pub fn with_session(&self, session_id: Option<SessionId>) -> Self {
        let mut view = self.clone();
        view.identity.session_id = session_id;
        view
    }

    /// A view of this client that sends neither token nor session id.
    #[must_use]
    pub fn anonymous(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            identity: Identity::anonymous(),
        }
    }

    // =========================================================================
    // Request plumbing
    // =========================================================================

    /// Build an endpoint URL from path segments and non-empty query pairs.
    pub(crate) fn url(
        &self,
        segments: &[&str],
        query: &[(&'static str, String)],
    ) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);

        let pairs: Vec<&(&str, String)> = query.iter().filter(|(_, v)| !v.is_empty()).collect();
        if !pairs.is_empty() {
            let mut serializer = url.query_pairs_mut();
            for (key, value) in pairs {
                serializer.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Send a request and decode the JSON body.
    ///
    /// Returns `Ok(None)` for `204 No Content`.
    pub(crate) async fn send<T, B>(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&'static str, String)],
        body: Option<&B>,
    ) -> Result<Option<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(segments, query)?;
        let request_id = Uuid::new_v4().to_string();

        let mut request = self
            .inner
            .client
            .request(method.clone(), url.clone())
            .header(REQUEST_ID_HEADER, &request_id);

        if let Some(token) = &self.identity.token {
            request = request.bearer_auth(token.expose_secret());
        }
        if let Some(session_id) = &self.identity.session_id {
            request = request.header(SESSION_HEADER, session_id.as_str());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        debug!(
            method = %method,
            path = %url.path(),
            status = %status,
            request_id = %request_id,
            "storefront API response"
        );

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        // Body as text first for better error diagnostics
        let text = response.text().await?;

        if !status.is_success() {
            let err = ApiError::from_response(status.as_u16(), &text);
            if status.is_server_error() {
                tracing::error!(
                    status = %status,
                    path = %url.path(),
                    body = %text.chars().take(500).collect::<String>(),
                    "storefront API returned server error"
                );
            }
            return Err(err);
        }

        if text.trim().is_empty() {
            return Ok(None);
        }

        match serde_json::from_str(&text) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    path = %url.path(),
                    body = %text.chars().take(500).collect::<String>(),
                    "Failed to parse storefront API response"
                );
                Err(ApiError::Parse(e))
            }
        }
    }

    /// Send a request whose response is wrapped in `{ "data": ... }`.
    pub(crate) async fn send_data<T, B>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send::<ApiResponse<T>, B>(method, segments, &[], body)
            .await?
            .map(|envelope| envelope.data)
            .ok_or_else(|| ApiError::EmptyBody(segments.join("/")))
    }

    /// `GET` a `{ "data": ... }` resource.
    pub(crate) async fn get_data<T: DeserializeOwned>(
        &self,
        segments: &[&str],
    ) -> Result<T, ApiError> {
        self.send_data::<T, ()>(Method::GET, segments, None).await
    }

    /// `GET` a response that is not wrapped in a data envelope.
    pub(crate) async fn get_raw<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&'static str, String)],
    ) -> Result<T, ApiError> {
        self.send::<T, ()>(Method::GET, segments, query, None)
            .await?
            .ok_or_else(|| ApiError::EmptyBody(segments.join("/")))
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    pub(crate) async fn cached(&self, key: &CacheKey) -> Option<CacheValue> {
        self.inner.cache.get(key).await
    }

    pub(crate) async fn store(&self, key: CacheKey, value: CacheValue) {
        self.inner.cache.insert(key, value).await;
    }

    /// Drop the cached storefront configuration.
    pub async fn invalidate_storefront_config(&self) {
        self.inner.cache.invalidate(&CacheKey::StorefrontConfig).await;
    }

    /// Drop the cached home-page carousels.
    pub async fn invalidate_carousels(&self) {
        self.inner
            .cache
            .invalidate(&CacheKey::StorefrontCarousels)
            .await;
    }

    /// Invalidate all cached data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}
