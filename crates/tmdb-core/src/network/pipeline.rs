//! RequestPipeline - the single path every API call takes.
//!
//! Per call:
//! 1. Validate the request, then read the connectivity state
//! 2. Offline: answer from the response cache or fail with `OfflineAndNoCache`
//! 3. Online: build the URL, GET it, validate the status, decode the body
//! 4. Cache the raw body only after it decoded successfully
//!
//! Each call is a single attempt. Retries, backoff and pagination belong to
//! the caller.

use crate::cache::{CacheKey, ResponseCache};
use crate::config::ApiConfig;
use crate::error::{NetworkError, NetworkResult};
use crate::models::ApiStatus;
use crate::network::connectivity::{ConnectivityMonitor, ConnectivityState};
use crate::network::endpoint::EndpointRequest;
use crate::network::transport::HttpTransport;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// Orchestrates connectivity check, cache fallback, live fetch and decode.
pub struct RequestPipeline {
    base_url: String,
    api_key: String,
    transport: Arc<dyn HttpTransport>,
    connectivity: Arc<ConnectivityMonitor>,
    cache: ResponseCache,
}

impl RequestPipeline {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
        connectivity: Arc<ConnectivityMonitor>,
        cache: ResponseCache,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            transport,
            connectivity,
            cache,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn connectivity(&self) -> &Arc<ConnectivityMonitor> {
        &self.connectivity
    }

    /// Execute `request` and decode the response as `T`.
    ///
    /// A malformed request fails with `InvalidUrl` before connectivity is
    /// consulted, so it never reads another request's cache entry.
    pub async fn execute<T: DeserializeOwned>(&self, request: &EndpointRequest) -> NetworkResult<T> {
        request.validate()?;
        let state = self.connectivity.current_state();
        let key = request.cache_key();

        if state.is_online {
            self.fetch_live(request, &key).await
        } else {
            self.load_cached(request, &key, state).await
        }
    }

    async fn load_cached<T: DeserializeOwned>(
        &self,
        request: &EndpointRequest,
        key: &CacheKey,
        state: ConnectivityState,
    ) -> NetworkResult<T> {
        let identity = request.identity();
        debug!(
            "Offline ({}); looking up cached {} for {}",
            state.detail,
            request.shape(),
            identity
        );

        let Some(bytes) = self.cache.get(key).await else {
            info!("No cached data for {} while offline", identity);
            return Err(NetworkError::OfflineAndNoCache);
        };

        serde_json::from_slice(&bytes).map_err(|e| {
            warn!(
                "Cached entry for {} does not decode as {}: {}",
                identity,
                request.shape(),
                e
            );
            NetworkError::OfflineAndNoCache
        })
    }

    async fn fetch_live<T: DeserializeOwned>(
        &self,
        request: &EndpointRequest,
        key: &CacheKey,
    ) -> NetworkResult<T> {
        let credential = (!self.api_key.is_empty())
            .then_some((ApiConfig::CREDENTIAL_PARAM, self.api_key.as_str()));
        let url = request.to_url(&self.base_url, credential)?;
        debug!("GET {}", redact_credential(&url));

        let response = self.transport.get(&url).await.map_err(|source| {
            warn!("Request for {} failed: {}", request.identity(), source);
            NetworkError::RequestFailed { source }
        })?;

        if !(100..=599).contains(&response.status) {
            warn!(
                "Malformed status {} for {}",
                response.status,
                request.identity()
            );
            return Err(NetworkError::InvalidResponse);
        }

        if !(200..=299).contains(&response.status) {
            warn!(
                "Server error {} for {}: {}",
                response.status,
                request.identity(),
                ApiStatus::describe(&response.body)
            );
            return Err(NetworkError::ServerError {
                status_code: response.status,
            });
        }

        let value = serde_json::from_slice(&response.body).map_err(|source| {
            warn!(
                "Response for {} does not decode as {}: {}",
                request.identity(),
                request.shape(),
                source
            );
            NetworkError::DecodingFailed { source }
        })?;

        self.cache.put(key, response.body).await;
        debug!("Fetched and cached {}", request.identity());
        Ok(value)
    }
}

/// URL for log lines, with the credential value masked.
pub(crate) fn redact_credential(url: &Url) -> String {
    if !url.query_pairs().any(|(k, _)| k == ApiConfig::CREDENTIAL_PARAM) {
        return url.to_string();
    }
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == ApiConfig::CREDENTIAL_PARAM {
                "***".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

impl std::fmt::Debug for RequestPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestPipeline")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("connectivity", &self.connectivity)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
