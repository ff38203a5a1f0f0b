//! Cache types and configuration.

use serde::{Deserialize, Serialize};
use sheetbridge_core::{Error, Result};
use std::time::Duration;

/// Compression algorithm applied to oversized payloads.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CompressionType {
    #[default]
    Gzip,
    Zstd,
    Lz4,
}

/// Digest used for the multipart checksum.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    #[default]
    Md5,
    Sha256,
}

/// Cache client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Largest value, in characters, stored in a single backend slot.
    #[serde(default = "default_slot_size")]
    pub slot_size: usize,
    /// TTL applied when a write does not name one.
    #[serde(default = "default_ttl_minutes")]
    pub default_ttl_minutes: u32,
    /// Backend TTL ceiling.
    #[serde(default = "default_max_ttl_minutes")]
    pub max_ttl_minutes: u32,
    /// Bounded wait for the process lock.
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
    #[serde(default)]
    pub compression: CompressionType,
    #[serde(default)]
    pub digest: DigestAlgorithm,
}

fn default_slot_size() -> usize {
    100_000
}

fn default_ttl_minutes() -> u32 {
    60
}

fn default_max_ttl_minutes() -> u32 {
    360
}

fn default_lock_timeout_ms() -> u64 {
    3_000
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            slot_size: default_slot_size(),
            default_ttl_minutes: default_ttl_minutes(),
            max_ttl_minutes: default_max_ttl_minutes(),
            lock_timeout_ms: default_lock_timeout_ms(),
            compression: CompressionType::default(),
            digest: DigestAlgorithm::default(),
        }
    }
}

impl CacheConfig {
    pub fn with_slot_size(mut self, slot_size: usize) -> Self {
        self.slot_size = slot_size;
        self
    }

    pub fn with_default_ttl_minutes(mut self, minutes: u32) -> Self {
        self.default_ttl_minutes = minutes;
        self
    }

    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_compression(mut self, compression: CompressionType) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_digest(mut self, digest: DigestAlgorithm) -> Self {
        self.digest = digest;
        self
    }

    /// Reject settings a cache cannot operate with.
    pub fn validate(&self) -> Result<()> {
        if self.slot_size == 0 {
            return Err(Error::Config("cache slot_size must be positive".to_string()));
        }
        if self.max_ttl_minutes < 2 {
            return Err(Error::Config(format!(
                "cache max_ttl_minutes must leave room for part records, got {}",
                self.max_ttl_minutes
            )));
        }
        Ok(())
    }

    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    /// TTLs in seconds for an index (or single-slot value) and its parts.
    /// Parts live exactly one minute longer than the index, and both stay
    /// within the backend ceiling.
    pub fn ttl_secs(&self, ttl_minutes: Option<u32>) -> (u64, u64) {
        let ceiling = self.max_ttl_minutes.saturating_sub(1).max(1);
        let minutes = ttl_minutes
            .unwrap_or(self.default_ttl_minutes)
            .clamp(1, ceiling) as u64;
        (minutes * 60, (minutes + 1) * 60)
    }
}

/// Index stored under the derived key of a multipart entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRecord {
    pub checksum: String,
    #[serde(rename = "partKeys")]
    pub part_keys: Vec<String>,
}

/// How a write laid the value out in the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreLayout {
    /// Plain JSON in one slot.
    Inline,
    /// Base64 of the compressed JSON in one slot.
    Compressed,
    /// Index record plus `parts` slots of the encoded blob.
    Multipart { parts: usize },
}

/// Result of a cache read.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup<T> {
    Hit(T),
    /// Nothing stored, or a part expired before its index.
    Miss,
    /// Reassembled multipart data failed its checksum.
    Corrupt { expected: String, actual: String },
}

impl<T> CacheLookup<T> {
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheLookup::Hit(_))
    }

    /// The cached value, treating corruption as absence.
    pub fn into_option(self) -> Option<T> {
        match self {
            CacheLookup::Hit(value) => Some(value),
            _ => None,
        }
    }
}

/// Outcome of a combined read-or-write call.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheOutcome {
    Stored(StoreLayout),
    Found(CacheLookup<serde_json::Value>),
}

/// Backend I/O counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub gets: u64,
    pub puts: u64,
    pub hits: u64,
    pub misses: u64,
    pub bytes_written: u64,
}
