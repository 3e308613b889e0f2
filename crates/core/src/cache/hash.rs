//! Content-addressed cache key generation.

use sha2::{Digest, Sha256};

/// Compute the cache key for a page URL.
///
/// The URL is hashed exactly as given; callers that want `HTTP://X` and
/// `http://x` to share an entry must normalize first.
pub fn compute_cache_key(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}
