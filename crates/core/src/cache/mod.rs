//! Content-addressed on-disk cache for fetched page bodies.
//!
//! Each URL maps to one file named by the hex SHA-256 of the URL. Entries are
//! written once and never expire; clearing the directory is the only way to
//! invalidate them.

pub mod disk;
pub mod hash;

pub use disk::DiskCache;
pub use hash::compute_cache_key;
