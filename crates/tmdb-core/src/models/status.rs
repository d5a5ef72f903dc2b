//! TMDB status body returned alongside error responses.

use serde::{Deserialize, Serialize};

/// Error payload the API sends with non-2xx responses, for example
/// `{"success": false, "status_code": 34, "status_message": "..."}`.
///
/// Only decoded for diagnostics; it never changes the error a caller sees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiStatus {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub status_code: Option<i64>,
    #[serde(default)]
    pub status_message: Option<String>,
}

impl ApiStatus {
    /// Best-effort summary of an error body for log lines.
    pub fn describe(body: &[u8]) -> String {
        match serde_json::from_slice::<ApiStatus>(body) {
            Ok(ApiStatus {
                status_code: Some(code),
                status_message: Some(message),
                ..
            }) => format!("TMDB status {}: {}", code, message),
            _ => String::from_utf8_lossy(body).chars().take(512).collect(),
        }
    }
}
