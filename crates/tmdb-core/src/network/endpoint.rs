//! Logical API requests.
//!
//! An [`EndpointRequest`] names one API call independently of where it is
//! sent and which credential is used: the pipeline adds the base URL and
//! the `api_key` parameter only when it builds the live URL. Its identity
//! string (path plus sorted, form-encoded parameters) is what the response
//! cache is keyed on, so reordering parameters never changes the key.

use crate::cache::CacheKey;
use crate::error::{NetworkError, NetworkResult};
use url::form_urlencoded;
use url::Url;

/// Expected shape of a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseShape {
    MoviePage,
    MovieDetail,
}

impl ResponseShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseShape::MoviePage => "movie_page",
            ResponseShape::MovieDetail => "movie_detail",
        }
    }
}

impl std::fmt::Display for ResponseShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable description of one API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointRequest {
    path: String,
    params: Vec<(String, String)>,
    shape: ResponseShape,
}

impl EndpointRequest {
    pub fn new(path: impl Into<String>, shape: ResponseShape) -> Self {
        Self {
            path: path.into(),
            params: Vec::new(),
            shape,
        }
    }

    /// Append a query parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// Trending movies of the day.
    pub fn trending_movies(page: u32) -> Self {
        Self::new("/trending/movie/day", ResponseShape::MoviePage).param("page", page)
    }

    pub fn movie_details(id: u64) -> Self {
        Self::new(format!("/movie/{}", id), ResponseShape::MovieDetail)
    }

    pub fn search_movies(query: &str, page: u32) -> Self {
        Self::new("/search/movie", ResponseShape::MoviePage)
            .param("query", query)
            .param("page", page)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn shape(&self) -> ResponseShape {
        self.shape
    }

    /// Canonical identity: path, then `?` and the parameters sorted by key
    /// and value, form-encoded and joined with `&`.
    pub fn identity(&self) -> String {
        if self.params.is_empty() {
            return self.path.clone();
        }
        let mut sorted: Vec<&(String, String)> = self.params.iter().collect();
        sorted.sort();

        let mut query = form_urlencoded::Serializer::new(String::new());
        for (key, value) in sorted {
            query.append_pair(key, value);
        }
        format!("{}?{}", self.path, query.finish())
    }

    /// Check that the path is absolute and carries no query, fragment,
    /// whitespace or control characters.
    ///
    /// Parameters belong in `params`; `/x?a=1` is not the same request as
    /// `/x` with `a=1`.
    pub fn validate(&self) -> NetworkResult<()> {
        if !self.path.starts_with('/') {
            return Err(NetworkError::InvalidUrl {
                reason: format!("path must start with '/': {:?}", self.path),
            });
        }
        if let Some(c) = self
            .path
            .chars()
            .find(|c| matches!(c, '?' | '#') || c.is_whitespace() || c.is_control())
        {
            return Err(NetworkError::InvalidUrl {
                reason: format!("path contains {:?}: {:?}", c, self.path),
            });
        }
        Ok(())
    }

    pub fn cache_key(&self) -> CacheKey {
        CacheKey::from_identity(&self.identity())
    }

    /// Build the absolute URL for this request under `base_url`.
    ///
    /// `credential` is appended after the request's own parameters.
    pub fn to_url(&self, base_url: &str, credential: Option<(&str, &str)>) -> NetworkResult<Url> {
        let invalid = |reason: String| NetworkError::InvalidUrl { reason };
        self.validate()?;

        let joined = format!("{}{}", base_url.trim_end_matches('/'), self.path);
        let mut url = Url::parse(&joined).map_err(|e| invalid(format!("{}: {}", e, base_url)))?;
        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(invalid(format!("unsupported base URL: {}", base_url)));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(invalid(format!("base URL must not carry a query: {}", base_url)));
        }

        if !self.params.is_empty() || credential.is_some() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.params {
                pairs.append_pair(key, value);
            }
            if let Some((name, value)) = credential {
                pairs.append_pair(name, value);
            }
        }
        Ok(url)
    }
}
