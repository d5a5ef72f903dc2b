//! Cache key derivation.

use sha2::{Digest, Sha256};

/// Filesystem-safe key addressing one cached response.
///
/// Format v1 is `"v1-"` followed by the first 32 lowercase hex digits
/// (128 bits) of the SHA-256 digest of the request identity string. The
/// format is persisted on disk; changing it orphans existing entries, so a
/// new format must bump the version prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub const VERSION: &'static str = "v1";
    const FINGERPRINT_HEX_LEN: usize = 32;

    pub fn from_identity(identity: &str) -> Self {
        let digest = hex::encode(Sha256::digest(identity.as_bytes()));
        Self(format!(
            "{}-{}",
            Self::VERSION,
            &digest[..Self::FINGERPRINT_HEX_LEN]
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `key` only contains characters safe in a file name.
    pub fn is_filesystem_safe(key: &str) -> bool {
        !key.is_empty()
            && key
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
