//! Advisory response cache.
//!
//! Raw response bytes are stored per request identity so that a request
//! made while offline can be answered from the last successful fetch.
//! The cache never expires entries on its own: an entry is overwritten by
//! the next successful fetch of the same request, or removed by `clear`.
//!
//! - [`CacheKey`]: versioned, filesystem-safe key derived from identity
//! - [`CacheBackend`]: namespaced byte-blob storage (disk or memory)
//! - [`ResponseCache`]: async facade that logs and swallows write failures

mod fs;
mod key;
mod memory;
mod response;
mod traits;

pub use fs::FsCacheBackend;
pub use key::CacheKey;
pub use memory::MemoryCacheBackend;
pub use response::ResponseCache;
pub use traits::{CacheBackend, CacheMeta};
