//! TMDB Core - offline-aware client library for The Movie Database API.
//!
//! Every API call goes through one request pipeline: it checks the current
//! connectivity state, answers from the on-disk response cache while
//! offline, and otherwise fetches, validates and decodes the live response
//! before caching its raw bytes for later offline use.
//!
//! # Example
//!
//! ```rust,ignore
//! use tmdb_core::{Credentials, TmdbApi};
//!
//! #[tokio::main]
//! async fn main() -> tmdb_core::Result<()> {
//!     let api = TmdbApi::builder(Credentials::from_env()?).build().await?;
//!
//!     let page = api.fetch_trending_page(1).await?;
//!     println!("{} trending movies", page.results.len());
//!
//!     let detail = api.fetch_movie_detail(550).await?;
//!     println!("{}: {:?}", detail.title, detail.formatted_runtime());
//!
//!     Ok(())
//! }
//! ```

pub mod atomic;
pub mod cache;
pub mod config;
pub mod error;
pub mod favorites;
pub mod models;
pub mod network;

mod api;

// Re-export commonly used types
pub use cache::{CacheBackend, CacheKey, CacheMeta, FsCacheBackend, MemoryCacheBackend, ResponseCache};
pub use config::{Credentials, ImageSize};
pub use error::{NetworkError, NetworkErrorKind, NetworkResult, Result, TmdbError, TransportError};
pub use favorites::{FavoritesStore, JsonFavoritesStore};
pub use models::{ApiStatus, Genre, Movie, MovieDetail, MoviePage, ProductionCompany};
pub use network::{
    ConnectivityMonitor, ConnectivityState, EndpointRequest, HttpResponse, HttpTransport,
    PathMonitor, PathStatus, ProbePathMonitor, ReqwestTransport, RequestPipeline, ResponseShape,
};

pub use api::TmdbApiBuilder;

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Main API struct for TMDB operations.
///
/// Owns the request pipeline and the favorites store. Construct it with
/// [`TmdbApi::builder`]; each instance carries its own collaborators, so
/// several can coexist in one process.
pub struct TmdbApi {
    data_dir: PathBuf,
    pipeline: RequestPipeline,
    favorites: Arc<dyn FavoritesStore>,
}

impl TmdbApi {
    /// Create a builder for TmdbApi.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let api = TmdbApi::builder(Credentials::new("key"))
    ///     .cache_dir("/tmp/tmdb")
    ///     .probe_connectivity(false)
    ///     .build()
    ///     .await?;
    /// ```
    pub fn builder(credentials: Credentials) -> TmdbApiBuilder {
        TmdbApiBuilder::new(credentials)
    }

    /// Directory holding favorites and, by default, the response cache.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn favorites(&self) -> &Arc<dyn FavoritesStore> {
        &self.favorites
    }
}

impl std::fmt::Debug for TmdbApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbApi")
            .field("data_dir", &self.data_dir)
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use async_trait::async_trait;
    use tempfile::TempDir;
    use url::Url;

    struct StaticTransport(&'static str);

    #[async_trait]
    impl HttpTransport for StaticTransport {
        async fn get(&self, _url: &Url) -> std::result::Result<HttpResponse, TransportError> {
            Ok(HttpResponse::new(200, self.0))
        }
    }

    fn credentials(temp: &TempDir) -> Credentials {
        let mut credentials = Credentials::new("test-key");
        credentials.data_dir = temp.path().to_path_buf();
        credentials
    }

    #[tokio::test]
    async fn test_builder_defaults_do_not_touch_disk() {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join("data");
        let mut credentials = Credentials::new("test-key");
        credentials.data_dir = data_dir.clone();

        let api = TmdbApi::builder(credentials)
            .probe_connectivity(false)
            .build()
            .await
            .unwrap();

        assert!(api.is_online());
        assert_eq!(api.data_dir(), data_dir.as_path());
        assert!(!data_dir.exists());
        assert_eq!(api.cache_stats().await.unwrap().entry_count, 0);
    }

    #[tokio::test]
    async fn test_trending_fetch_is_cached_on_disk() {
        let temp = TempDir::new().unwrap();
        let body = r#"{"page":1,"results":[{"id":1,"title":"One","overview":""}],"total_pages":3,"total_results":41}"#;
        let api = TmdbApi::builder(credentials(&temp))
            .transport(Arc::new(StaticTransport(body)))
            .probe_connectivity(false)
            .build()
            .await
            .unwrap();

        let page = api.fetch_trending_page(1).await.unwrap();
        assert_eq!(page.results[0].title, "One");
        assert!(page.has_more());

        let stats = api.cache_stats().await.unwrap();
        assert_eq!(stats.entry_count, 1);
        assert_eq!(stats.total_size_bytes, body.len() as u64);

        api.clear_cache().await.unwrap();
        assert_eq!(api.cache_stats().await.unwrap().entry_count, 0);
    }

    #[tokio::test]
    async fn test_favorites_live_in_data_dir() {
        let temp = TempDir::new().unwrap();
        let api = TmdbApi::builder(credentials(&temp))
            .probe_connectivity(false)
            .build()
            .await
            .unwrap();

        assert!(api.favorites().toggle(550).unwrap());
        assert!(temp.path().join(config::PathsConfig::FAVORITES_FILENAME).is_file());
    }

    #[tokio::test]
    async fn test_debug_hides_api_key() {
        let temp = TempDir::new().unwrap();
        let api = TmdbApi::builder(credentials(&temp))
            .probe_connectivity(false)
            .build()
            .await
            .unwrap();
        assert!(!format!("{:?}", api).contains("test-key"));
    }
}
