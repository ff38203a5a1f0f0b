//! Cache backend trait and implementations.

use crate::keys::sanitize_key;
use crate::types::CacheStats;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sheetbridge_core::{Error, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

/// A size- and time-limited string key-value cache.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Store a value for `ttl_secs` seconds.
    async fn put(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()>;

    /// Get a value, or `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;
}

/// Largest value a single slot accepts, in characters.
pub const DEFAULT_MAX_VALUE_CHARS: usize = 100_000;

/// Longest TTL a backend accepts (6 hours).
pub const DEFAULT_MAX_TTL_SECS: u64 = 21_600;

struct StoredValue {
    value: String,
    expires_at: Instant,
}

/// In-process backend enforcing the same per-slot limits as a hosted
/// cache service.
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, StoredValue>>,
    max_value_chars: usize,
    max_ttl_secs: u64,
    gets: AtomicU64,
    puts: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    bytes_written: AtomicU64,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_MAX_VALUE_CHARS, DEFAULT_MAX_TTL_SECS)
    }

    pub fn with_limits(max_value_chars: usize, max_ttl_secs: u64) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_value_chars,
            max_ttl_secs,
            gets: AtomicU64::new(0),
            puts: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
        }
    }

    /// Drop an entry as if it had expired.
    pub async fn evict(&self, key: &str) -> bool {
        self.entries.write().await.remove(key).is_some()
    }

    /// Keys currently held, expired or not.
    pub async fn keys(&self) -> Vec<String> {
        self.entries.read().await.keys().cloned().collect()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            gets: self.gets.load(Ordering::Relaxed),
            puts: self.puts.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn put(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        self.puts.fetch_add(1, Ordering::Relaxed);

        let chars = value.chars().count();
        if chars > self.max_value_chars {
            return Err(Error::Backend(format!(
                "Value for {} is {} characters, limit is {}",
                key, chars, self.max_value_chars
            )));
        }
        if ttl_secs > self.max_ttl_secs {
            return Err(Error::Backend(format!(
                "TTL {}s for {} exceeds limit of {}s",
                ttl_secs, key, self.max_ttl_secs
            )));
        }

        self.bytes_written
            .fetch_add(value.len() as u64, Ordering::Relaxed);
        self.entries.write().await.insert(
            key.to_string(),
            StoredValue {
                value: value.to_string(),
                expires_at: Instant::now() + Duration::from_secs(ttl_secs),
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.gets.fetch_add(1, Ordering::Relaxed);

        let value = {
            let entries = self.entries.read().await;
            entries
                .get(key)
                .filter(|e| e.expires_at > Instant::now())
                .map(|e| e.value.clone())
        };

        match value {
            Some(value) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Ok(Some(value))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
        }
    }
}

/// On-disk envelope for one cached value.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Filesystem-based backend for local use: one JSON envelope per key.
pub struct FilesystemBackend {
    root_dir: PathBuf,
}

impl FilesystemBackend {
    pub fn new(root_dir: PathBuf) -> Self {
        Self { root_dir }
    }

    pub fn root_dir(&self) -> &PathBuf {
        &self.root_dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root_dir.join(format!("{}.json", sanitize_key(key)))
    }
}

#[async_trait]
impl CacheBackend for FilesystemBackend {
    async fn put(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        tokio::fs::create_dir_all(&self.root_dir)
            .await
            .map_err(|e| Error::Backend(format!("Failed to create cache dir: {}", e)))?;

        let envelope = Envelope {
            value: value.to_string(),
            expires_at: Utc::now() + chrono::Duration::seconds(ttl_secs as i64),
        };
        let contents = serde_json::to_vec(&envelope)?;

        tokio::fs::write(self.key_path(key), contents)
            .await
            .map_err(|e| Error::Backend(format!("Failed to write cache: {}", e)))?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        let contents = match tokio::fs::read(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::Backend(format!("Failed to read cache: {}", e))),
        };

        let envelope: Envelope = serde_json::from_slice(&contents)?;
        if envelope.expires_at <= Utc::now() {
            debug!(key = %key, "Removing expired cache file");
            tokio::fs::remove_file(&path)
                .await
                .map_err(|e| Error::Backend(format!("Failed to delete cache: {}", e)))?;
            return Ok(None);
        }
        Ok(Some(envelope.value))
    }
}
