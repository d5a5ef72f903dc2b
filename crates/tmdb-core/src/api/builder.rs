//! Builder for configuring TmdbApi initialization.

use std::path::PathBuf;
use std::sync::Arc;

use crate::cache::{CacheBackend, FsCacheBackend, ResponseCache};
use crate::config::{Credentials, PathsConfig};
use crate::error::Result;
use crate::favorites::{FavoritesStore, JsonFavoritesStore};
use crate::network::{
    ConnectivityMonitor, HttpTransport, ProbePathMonitor, ReqwestTransport, RequestPipeline,
};
use crate::TmdbApi;

/// Builder for configuring TmdbApi initialization.
///
/// Every collaborator has a production default and can be replaced, which
/// is how tests inject scripted transports and fixed connectivity.
///
/// # Example
///
/// ```rust,ignore
/// use tmdb_core::{Credentials, TmdbApi};
///
/// let api = TmdbApi::builder(Credentials::from_env()?)
///     .probe_connectivity(false)
///     .build()
///     .await?;
/// ```
pub struct TmdbApiBuilder {
    credentials: Credentials,
    cache_dir: Option<PathBuf>,
    cache_backend: Option<Arc<dyn CacheBackend>>,
    transport: Option<Arc<dyn HttpTransport>>,
    connectivity: Option<Arc<ConnectivityMonitor>>,
    favorites: Option<Arc<dyn FavoritesStore>>,
    probe_connectivity: bool,
}

impl TmdbApiBuilder {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            cache_dir: None,
            cache_backend: None,
            transport: None,
            connectivity: None,
            favorites: None,
            probe_connectivity: true,
        }
    }

    /// Override the API base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.credentials.base_url = base_url.into();
        self
    }

    /// Root directory for the on-disk response cache.
    ///
    /// Default: the credentials' data directory
    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Use a custom cache backend. Takes precedence over `cache_dir`.
    pub fn cache_backend(mut self, backend: Arc<dyn CacheBackend>) -> Self {
        self.cache_backend = Some(backend);
        self
    }

    /// Use a custom HTTP transport.
    ///
    /// Default: [`ReqwestTransport`] with the standard request timeout
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use an existing connectivity monitor. Takes precedence over
    /// `probe_connectivity`.
    pub fn connectivity(mut self, monitor: Arc<ConnectivityMonitor>) -> Self {
        self.connectivity = Some(monitor);
        self
    }

    /// Use a custom favorites store.
    pub fn favorites(mut self, store: Arc<dyn FavoritesStore>) -> Self {
        self.favorites = Some(store);
        self
    }

    /// Enable or disable background reachability probing.
    ///
    /// When disabled the monitor reports online for the life of the API.
    ///
    /// Default: `true`
    pub fn probe_connectivity(mut self, enable: bool) -> Self {
        self.probe_connectivity = enable;
        self
    }

    /// Build the TmdbApi instance.
    ///
    /// Nothing is written to disk here; cache and favorites directories are
    /// created on first write.
    pub async fn build(self) -> Result<TmdbApi> {
        let data_dir = self.credentials.data_dir.clone();

        let backend = match self.cache_backend {
            Some(backend) => backend,
            None => {
                let root = self.cache_dir.unwrap_or_else(|| data_dir.clone());
                tracing::debug!("Response cache root: {}", root.display());
                Arc::new(FsCacheBackend::new(root)) as Arc<dyn CacheBackend>
            }
        };

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new()?) as Arc<dyn HttpTransport>,
        };

        let connectivity = match self.connectivity {
            Some(monitor) => monitor,
            None if self.probe_connectivity => {
                Arc::new(ConnectivityMonitor::start(ProbePathMonitor::new()?))
            }
            None => Arc::new(ConnectivityMonitor::new()),
        };

        let favorites = match self.favorites {
            Some(store) => store,
            None => Arc::new(JsonFavoritesStore::open(
                data_dir.join(PathsConfig::FAVORITES_FILENAME),
            )) as Arc<dyn FavoritesStore>,
        };

        let pipeline = RequestPipeline::new(
            self.credentials.base_url,
            self.credentials.api_key,
            transport,
            connectivity,
            ResponseCache::new(backend),
        );
        tracing::info!("TMDB client ready for {}", pipeline.base_url());

        Ok(TmdbApi {
            data_dir,
            pipeline,
            favorites,
        })
    }
}
