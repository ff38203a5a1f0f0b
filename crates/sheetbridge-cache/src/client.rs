//! Chunked object cache client.
//!
//! Objects are stored in one of three layouts depending on size:
//!
//! 1. JSON text, when it fits one slot.
//! 2. Base64 of the compressed JSON, when that fits one slot.
//! 3. An index record under `multipartCache-{key}` holding a checksum and
//!    the ordered keys of the parts the encoded blob was split into. The
//!    index is written first and expires one minute before its parts.
//!
//! Every read and write holds the process lock for its full duration.

use crate::compression::{compress, decompress};
use crate::digest::checksum;
use crate::keys::{index_key, part_key, split_parts};
use crate::lock::{LockGuard, ProcessLock};
use crate::provider::CacheBackend;
use crate::types::{CacheConfig, CacheLookup, CacheOutcome, IndexRecord, StoreLayout};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sheetbridge_core::{Error, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Cache client bound to one backend and one process lock.
#[derive(Clone)]
pub struct CacheClient {
    backend: Arc<dyn CacheBackend>,
    lock: ProcessLock,
    config: CacheConfig,
}

impl CacheClient {
    pub fn new(backend: Arc<dyn CacheBackend>, lock: ProcessLock, config: CacheConfig) -> Self {
        Self {
            backend,
            lock,
            config,
        }
    }

    /// Client with a private lock and default configuration.
    pub fn with_backend(backend: Arc<dyn CacheBackend>) -> Self {
        Self::new(backend, ProcessLock::new(), CacheConfig::default())
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn lock(&self) -> &ProcessLock {
        &self.lock
    }

    /// Read when `object` is `None`, otherwise write it.
    pub async fn manage(
        &self,
        key: &str,
        object: Option<&serde_json::Value>,
        ttl_minutes: Option<u32>,
    ) -> Result<CacheOutcome> {
        match object {
            Some(object) => Ok(CacheOutcome::Stored(self.put(key, object, ttl_minutes).await?)),
            None => Ok(CacheOutcome::Found(self.get(key).await?)),
        }
    }

    /// Store `value` under `key`.
    pub async fn put<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl_minutes: Option<u32>,
    ) -> Result<StoreLayout> {
        let _guard = self.acquire().await?;
        self.store(key, value, ttl_minutes).await
    }

    /// Load the value stored under `key`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<CacheLookup<T>> {
        let _guard = self.acquire().await?;
        self.load(key).await
    }

    async fn acquire(&self) -> Result<LockGuard> {
        self.lock.acquire(self.config.lock_timeout()).await
    }

    async fn store<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl_minutes: Option<u32>,
    ) -> Result<StoreLayout> {
        self.config.validate()?;
        let (ttl_secs, part_ttl_secs) = self.config.ttl_secs(ttl_minutes);
        let slot = self.config.slot_size;

        let json = serde_json::to_string(value)?;
        if json.chars().count() < slot {
            self.backend.put(key, &json, ttl_secs).await?;
            debug!(key = %key, chars = json.len(), "Cached inline JSON");
            return Ok(StoreLayout::Inline);
        }

        let encoded = STANDARD.encode(compress(json.as_bytes(), self.config.compression)?);
        if encoded.len() < slot {
            self.backend.put(key, &encoded, ttl_secs).await?;
            debug!(key = %key, chars = encoded.len(), "Cached compressed blob");
            return Ok(StoreLayout::Compressed);
        }

        let parts = split_parts(&encoded, slot)?;
        let index = IndexRecord {
            checksum: checksum(encoded.as_bytes(), self.config.digest),
            part_keys: parts.iter().map(|_| part_key()).collect(),
        };

        self.backend
            .put(&index_key(key), &serde_json::to_string(&index)?, ttl_secs)
            .await?;
        for (part_key, part) in index.part_keys.iter().zip(&parts) {
            self.backend.put(part_key, part, part_ttl_secs).await?;
        }

        info!(
            key = %key,
            parts = parts.len(),
            chars = encoded.len(),
            "Cached multipart blob"
        );
        Ok(StoreLayout::Multipart { parts: parts.len() })
    }

    async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<CacheLookup<T>> {
        if let Some(raw) = self.backend.get(key).await? {
            return match serde_json::from_str::<T>(&raw) {
                Ok(value) => Ok(CacheLookup::Hit(value)),
                // Valid JSON of the wrong shape is the caller's problem, not a blob.
                Err(e) if e.is_data() => Err(e.into()),
                Err(_) => self.decode(&raw).map(CacheLookup::Hit),
            };
        }

        let Some(raw_index) = self.backend.get(&index_key(key)).await? else {
            debug!(key = %key, "Cache miss");
            return Ok(CacheLookup::Miss);
        };
        let index: IndexRecord = serde_json::from_str(&raw_index)?;

        let mut encoded = String::new();
        for part_key in &index.part_keys {
            match self.backend.get(part_key).await? {
                Some(part) => encoded.push_str(&part),
                None => {
                    warn!(key = %key, part = %part_key, "Multipart entry lost a part");
                    return Ok(CacheLookup::Miss);
                }
            }
        }

        let actual = checksum(encoded.as_bytes(), self.config.digest);
        if actual != index.checksum {
            warn!(
                key = %key,
                expected = %index.checksum,
                actual = %actual,
                "Multipart checksum mismatch"
            );
            return Ok(CacheLookup::Corrupt {
                expected: index.checksum,
                actual,
            });
        }

        self.decode(&encoded).map(CacheLookup::Hit)
    }

    fn decode<T: DeserializeOwned>(&self, encoded: &str) -> Result<T> {
        let compressed = STANDARD
            .decode(encoded)
            .map_err(|e| Error::Decode(format!("Invalid base64: {}", e)))?;
        let json = decompress(&compressed)?;
        Ok(serde_json::from_slice(&json)?)
    }
}
