//! Error types for the TMDB client.
//!
//! `NetworkError` is the closed taxonomy every API call resolves to.
//! `TmdbError` covers everything else the library touches (configuration,
//! the favorites file, the cache directory).

use std::path::PathBuf;
use thiserror::Error;

/// Failure reported by an [`HttpTransport`](crate::network::HttpTransport)
/// before any response was received.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {message}")]
    Connect { message: String },

    #[error("{message}")]
    Other { message: String },
}

/// Every way a single request through the pipeline can fail.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// The request path or parameters could not form an absolute URL.
    #[error("Invalid request URL: {reason}")]
    InvalidUrl { reason: String },

    /// Transport-level failure while online.
    #[error("Request failed: {source}")]
    RequestFailed {
        #[source]
        source: TransportError,
    },

    /// The response carried no usable HTTP status line.
    #[error("Invalid response from server")]
    InvalidResponse,

    /// HTTP status outside 200-299.
    #[error("Server returned status code {status_code}")]
    ServerError { status_code: u16 },

    /// The body did not parse into the expected shape.
    #[error("Failed to decode response: {source}")]
    DecodingFailed {
        #[source]
        source: serde_json::Error,
    },

    /// Offline, and no present and decodable cache entry exists.
    #[error("Offline and no cached data available")]
    OfflineAndNoCache,
}

/// Comparable discriminant of a [`NetworkError`].
///
/// The wrapped causes are not `Eq`, so callers and tests compare on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkErrorKind {
    InvalidUrl,
    RequestFailed,
    InvalidResponse,
    ServerError(u16),
    DecodingFailed,
    OfflineAndNoCache,
}

impl NetworkError {
    pub fn kind(&self) -> NetworkErrorKind {
        match self {
            NetworkError::InvalidUrl { .. } => NetworkErrorKind::InvalidUrl,
            NetworkError::RequestFailed { .. } => NetworkErrorKind::RequestFailed,
            NetworkError::InvalidResponse => NetworkErrorKind::InvalidResponse,
            NetworkError::ServerError { status_code } => NetworkErrorKind::ServerError(*status_code),
            NetworkError::DecodingFailed { .. } => NetworkErrorKind::DecodingFailed,
            NetworkError::OfflineAndNoCache => NetworkErrorKind::OfflineAndNoCache,
        }
    }

    /// Message suitable for showing to an end user next to a retry button.
    pub fn user_message(&self) -> String {
        match self {
            NetworkError::InvalidUrl { .. } => "The request URL was invalid.".to_string(),
            NetworkError::RequestFailed { source } => match source {
                TransportError::Timeout => "The network request timed out.".to_string(),
                TransportError::Connect { .. } => "Could not connect to the server.".to_string(),
                TransportError::Other { message } => format!("Network request failed: {}", message),
            },
            NetworkError::InvalidResponse => {
                "Received an invalid response from the server.".to_string()
            }
            NetworkError::ServerError { status_code } => format!(
                "Server returned an error with status code: {}.",
                status_code
            ),
            NetworkError::DecodingFailed { source } => {
                format!("Failed to decode data: {}", source)
            }
            NetworkError::OfflineAndNoCache => "You are currently offline and no cached data \
                                                is available for this content."
                .to_string(),
        }
    }

    /// Check if a caller-side retry has a chance of succeeding.
    ///
    /// The pipeline itself never retries; this is for retry loops above it.
    pub fn is_retryable(&self) -> bool {
        match self {
            NetworkError::RequestFailed { .. } => true,
            NetworkError::ServerError { status_code } => {
                matches!(status_code, 408 | 429 | 500..=599)
            }
            _ => false,
        }
    }
}

/// Result type for calls that resolve to the closed network taxonomy.
pub type NetworkResult<T> = std::result::Result<T, NetworkError>;

/// Library-wide error type.
#[derive(Debug, Error)]
pub enum TmdbError {
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias for library operations outside the request pipeline.
pub type Result<T> = std::result::Result<T, TmdbError>;

impl From<std::io::Error> for TmdbError {
    fn from(err: std::io::Error) -> Self {
        TmdbError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for TmdbError {
    fn from(err: serde_json::Error) -> Self {
        TmdbError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl TmdbError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        TmdbError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_error() -> serde_json::Error {
        serde_json::from_str::<u32>("\"nope\"").unwrap_err()
    }

    #[test]
    fn test_error_display() {
        let err = NetworkError::ServerError { status_code: 404 };
        assert_eq!(err.to_string(), "Server returned status code 404");
        assert_eq!(
            NetworkError::OfflineAndNoCache.to_string(),
            "Offline and no cached data available"
        );
    }

    #[test]
    fn test_kind_compares_without_cause() {
        let a = NetworkError::DecodingFailed { source: decode_error() };
        let b = NetworkError::DecodingFailed { source: decode_error() };
        assert_eq!(a.kind(), b.kind());
        assert_ne!(
            NetworkError::ServerError { status_code: 404 }.kind(),
            NetworkError::ServerError { status_code: 500 }.kind()
        );
    }

    #[test]
    fn test_user_messages_distinguish_transport_failures() {
        let timeout = NetworkError::RequestFailed { source: TransportError::Timeout };
        assert_eq!(timeout.user_message(), "The network request timed out.");

        let refused = NetworkError::RequestFailed {
            source: TransportError::Connect { message: "refused".into() },
        };
        assert_eq!(refused.user_message(), "Could not connect to the server.");

        let other = NetworkError::RequestFailed {
            source: TransportError::Other { message: "tls handshake".into() },
        };
        assert!(other.user_message().contains("tls handshake"));
    }

    #[test]
    fn test_retryable_errors() {
        assert!(NetworkError::RequestFailed { source: TransportError::Timeout }.is_retryable());
        assert!(NetworkError::ServerError { status_code: 503 }.is_retryable());
        assert!(NetworkError::ServerError { status_code: 429 }.is_retryable());
        assert!(!NetworkError::ServerError { status_code: 404 }.is_retryable());
        assert!(!NetworkError::OfflineAndNoCache.is_retryable());
        assert!(!NetworkError::DecodingFailed { source: decode_error() }.is_retryable());
    }
}
