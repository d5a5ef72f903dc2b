//! Centralized configuration for the TMDB client.
//!
//! Static API constants, on-disk layout names, image sizes, and the
//! credential loaded from the environment at startup.

use crate::error::{Result, TmdbError};
use std::path::PathBuf;
use std::time::Duration;

/// The Movie Database API configuration.
pub struct ApiConfig;

impl ApiConfig {
    pub const BASE_URL: &'static str = "https://api.themoviedb.org/3";
    pub const IMAGE_BASE_URL: &'static str = "https://image.tmdb.org/t/p/";
    pub const CREDENTIAL_PARAM: &'static str = "api_key";
    pub const USER_AGENT: &'static str = "tmdb-core/0.1";
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
}

/// Connectivity probing configuration.
pub struct ConnectivityConfig;

impl ConnectivityConfig {
    pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);
    pub const PROBE_INTERVAL: Duration = Duration::from_secs(30);

    pub fn default_probe_urls() -> Vec<String> {
        vec![ApiConfig::BASE_URL.to_string()]
    }
}

/// Shared directory and file names.
pub struct PathsConfig;

impl PathsConfig {
    pub const APP_DIR_NAME: &'static str = "tmdb";
    pub const CACHE_NAMESPACE: &'static str = "NetworkServiceCache";
    pub const CACHE_FILE_EXTENSION: &'static str = "json";
    pub const FAVORITES_FILENAME: &'static str = "favorite-movie-ids.json";

    /// Root directory for cached responses and favorites.
    ///
    /// Uses the platform cache directory, falling back to the temp dir when
    /// the platform reports none.
    pub fn default_data_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(Self::APP_DIR_NAME)
    }
}

/// Image widths served by the TMDB image CDN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageSize {
    Thumbnail,
    #[default]
    Small,
    Medium,
    Original,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::Thumbnail => "w92",
            ImageSize::Small => "w200",
            ImageSize::Medium => "w500",
            ImageSize::Original => "original",
        }
    }

    /// Full image URL for a TMDB-relative path such as `/abc.jpg`.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}{}", ApiConfig::IMAGE_BASE_URL, self.as_str(), path)
    }
}

impl std::str::FromStr for ImageSize {
    type Err = TmdbError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "w92" | "thumbnail" => Ok(ImageSize::Thumbnail),
            "w200" | "small" => Ok(ImageSize::Small),
            "w500" | "medium" => Ok(ImageSize::Medium),
            "original" => Ok(ImageSize::Original),
            other => Err(TmdbError::Config {
                message: format!("Unknown image size: {}", other),
            }),
        }
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Credentials and endpoint overrides resolved at startup.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub base_url: String,
    pub data_dir: PathBuf,
}

impl Credentials {
    pub const API_KEY_VAR: &'static str = "TMDB_API_KEY";
    pub const BASE_URL_VAR: &'static str = "TMDB_BASE_URL";
    pub const CACHE_DIR_VAR: &'static str = "TMDB_CACHE_DIR";

    /// Credentials with the default base URL and data directory.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: ApiConfig::BASE_URL.to_string(),
            data_dir: PathsConfig::default_data_dir(),
        }
    }

    /// Load from `TMDB_API_KEY`, with optional `TMDB_BASE_URL` and
    /// `TMDB_CACHE_DIR` overrides.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup(Self::API_KEY_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| TmdbError::Config {
                message: format!("{} is not set or is empty", Self::API_KEY_VAR),
            })?;

        let mut credentials = Self::new(api_key);
        if let Some(base_url) = lookup(Self::BASE_URL_VAR).filter(|v| !v.is_empty()) {
            credentials.base_url = base_url;
        }
        if let Some(dir) = lookup(Self::CACHE_DIR_VAR).filter(|v| !v.is_empty()) {
            credentials.data_dir = PathBuf::from(dir);
        }
        Ok(credentials)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("data_dir", &self.data_dir)
            .finish()
    }
}
