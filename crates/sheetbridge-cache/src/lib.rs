//! Chunked object cache for key-value backends with a per-value size
//! ceiling.

pub mod client;
pub mod compression;
pub mod digest;
pub mod keys;
pub mod lock;
pub mod provider;
pub mod types;

pub use client::CacheClient;
pub use compression::{compress, decompress};
pub use digest::checksum;
pub use keys::{index_key, part_key, sanitize_key, split_parts};
pub use lock::{LockGuard, ProcessLock};
pub use provider::{CacheBackend, FilesystemBackend, MemoryBackend};
pub use types::{
    CacheConfig, CacheLookup, CacheOutcome, CacheStats, CompressionType, DigestAlgorithm,
    IndexRecord, StoreLayout,
};
