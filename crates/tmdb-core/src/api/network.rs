//! Connectivity and cache methods on TmdbApi.

use std::sync::Arc;

use crate::cache::CacheMeta;
use crate::error::Result;
use crate::network::{ConnectivityMonitor, ConnectivityState, RequestPipeline};
use crate::TmdbApi;

impl TmdbApi {
    // ========================================
    // Network Connectivity
    // ========================================

    pub fn is_online(&self) -> bool {
        self.pipeline.connectivity().is_online()
    }

    /// Most recently observed connectivity state.
    pub fn connectivity_state(&self) -> ConnectivityState {
        self.pipeline.connectivity().current_state()
    }

    pub fn connectivity(&self) -> &Arc<ConnectivityMonitor> {
        self.pipeline.connectivity()
    }

    // ========================================
    // Response Cache
    // ========================================

    /// Delete every cached response.
    pub async fn clear_cache(&self) -> Result<()> {
        self.pipeline.cache().clear().await
    }

    /// Entry count and size of the response cache.
    pub async fn cache_stats(&self) -> Result<CacheMeta> {
        self.pipeline.cache().stats().await
    }

    /// Get the request pipeline for direct access.
    pub fn pipeline(&self) -> &RequestPipeline {
        &self.pipeline
    }
}
