//! End-to-end behaviour of the chunked object cache.

use async_trait::async_trait;
use serde_json::{Value, json};
use sheetbridge_cache::{
    CacheBackend, CacheClient, CacheConfig, CacheLookup, CacheStats, CompressionType,
    DigestAlgorithm, FilesystemBackend, IndexRecord, MemoryBackend, ProcessLock, StoreLayout,
    compress, index_key,
};
use sheetbridge_core::{Error, Result};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{Notify, Semaphore};

/// Records every put so ordering and TTLs can be asserted.
#[derive(Default)]
struct RecordingBackend {
    inner: MemoryBackend,
    puts: Mutex<Vec<(String, u64)>>,
}

impl RecordingBackend {
    fn puts(&self) -> Vec<(String, u64)> {
        self.puts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CacheBackend for RecordingBackend {
    async fn put(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        self.puts.lock().unwrap().push((key.to_string(), ttl_secs));
        self.inner.put(key, value, ttl_secs).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key).await
    }
}

/// Holds every put until the gate opens, announcing the first one.
struct GatedBackend {
    inner: MemoryBackend,
    entered: Notify,
    gate: Semaphore,
}

impl GatedBackend {
    fn closed() -> Self {
        Self {
            inner: MemoryBackend::new(),
            entered: Notify::new(),
            gate: Semaphore::new(0),
        }
    }

    fn open(&self) {
        self.gate.add_permits(1);
    }
}

#[async_trait]
impl CacheBackend for GatedBackend {
    async fn put(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        self.entered.notify_one();
        let _permit = self.gate.acquire().await.unwrap();
        self.inner.put(key, value, ttl_secs).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key).await
    }
}

/// Large JSON that compresses well.
fn compressible() -> Value {
    json!(vec!["Order shipped from warehouse"; 10_000])
}

/// Large JSON of random hex that stays large after compression.
fn incompressible() -> Value {
    json!((0..10_000).map(|_| uuid::Uuid::new_v4().to_string()).collect::<Vec<_>>())
}

async fn read_index(backend: &MemoryBackend, key: &str) -> IndexRecord {
    let raw = backend.get(&index_key(key)).await.unwrap().expect("index");
    serde_json::from_str(&raw).unwrap()
}

#[tokio::test]
async fn test_roundtrip_each_layout() {
    let backend = Arc::new(MemoryBackend::new());
    let client = CacheClient::with_backend(backend.clone());

    let small = json!({"sheet": "Orders", "rows": [[1, "a"], [2, "b"]]});
    let medium = compressible();
    let large = incompressible();

    assert_eq!(client.put("small", &small, Some(10)).await.unwrap(), StoreLayout::Inline);
    assert_eq!(client.put("medium", &medium, Some(10)).await.unwrap(), StoreLayout::Compressed);
    assert!(matches!(
        client.put("large", &large, Some(10)).await.unwrap(),
        StoreLayout::Multipart { parts } if parts >= 2
    ));

    assert_eq!(client.get::<Value>("small").await.unwrap(), CacheLookup::Hit(small));
    assert_eq!(client.get::<Value>("medium").await.unwrap(), CacheLookup::Hit(medium));
    assert_eq!(client.get::<Value>("large").await.unwrap(), CacheLookup::Hit(large));
}

#[tokio::test]
async fn test_repeated_reads_are_equal() {
    let client = CacheClient::with_backend(Arc::new(MemoryBackend::new()));
    client.put("large", &incompressible(), None).await.unwrap();

    let first = client.get::<Value>("large").await.unwrap();
    let second = client.get::<Value>("large").await.unwrap();
    assert!(first.is_hit());
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_typed_roundtrip() {
    let client = CacheClient::with_backend(Arc::new(MemoryBackend::new()));
    let rows: Vec<(u32, String)> = (0..20_000).map(|i| (i, format!("row-{}", i))).collect();

    client.put("rows", &rows, None).await.unwrap();
    let lookup = client.get::<Vec<(u32, String)>>("rows").await.unwrap();
    assert_eq!(lookup.into_option(), Some(rows));
}

#[tokio::test]
async fn test_index_written_first_and_parts_outlive_it() {
    let backend = Arc::new(RecordingBackend::default());
    let client = CacheClient::with_backend(backend.clone());

    let layout = client.put("large", &incompressible(), Some(30)).await.unwrap();
    let StoreLayout::Multipart { parts } = layout else {
        panic!("expected multipart layout, got {:?}", layout);
    };

    let puts = backend.puts();
    assert_eq!(puts.len(), parts + 1);
    assert_eq!(puts[0], ("multipartCache-large".to_string(), 30 * 60));
    for (_, ttl) in &puts[1..] {
        assert_eq!(*ttl, 31 * 60);
    }
}

#[tokio::test]
async fn test_lost_part_reads_as_miss() {
    let backend = Arc::new(MemoryBackend::new());
    let client = CacheClient::with_backend(backend.clone());
    client.put("large", &incompressible(), None).await.unwrap();

    let index = read_index(&backend, "large").await;
    assert!(backend.evict(&index.part_keys[1]).await);

    let lookup = client.get::<Value>("large").await.unwrap();
    assert_eq!(lookup, CacheLookup::Miss);
}

#[tokio::test]
async fn test_tampered_part_reads_as_corrupt() {
    let backend = Arc::new(MemoryBackend::new());
    let client = CacheClient::with_backend(backend.clone());
    client.put("large", &incompressible(), None).await.unwrap();

    let index = read_index(&backend, "large").await;
    let first = backend.get(&index.part_keys[0]).await.unwrap().unwrap();
    let flipped = if first.starts_with('A') { "B" } else { "A" };
    let tampered = format!("{}{}", flipped, &first[1..]);
    backend.put(&index.part_keys[0], &tampered, 600).await.unwrap();

    match client.get::<Value>("large").await.unwrap() {
        CacheLookup::Corrupt { expected, actual } => {
            assert_eq!(expected, index.checksum);
            assert_ne!(expected, actual);
        }
        other => panic!("expected corrupt lookup, got {:?}", other),
    }
}

#[tokio::test]
async fn test_lock_timeout_performs_no_io() {
    let backend = Arc::new(MemoryBackend::new());
    let lock = ProcessLock::new();
    let config = CacheConfig::default().with_lock_timeout(Duration::from_millis(50));
    let client = CacheClient::new(backend.clone(), lock.clone(), config);

    let _held = lock.acquire(Duration::from_millis(50)).await.unwrap();

    let err = client.get::<Value>("k").await.unwrap_err();
    assert!(matches!(err, Error::LockTimeout { waited_ms: 50 }));
    let err = client.put("k", &json!(1), None).await.unwrap_err();
    assert!(matches!(err, Error::LockTimeout { .. }));

    assert_eq!(backend.stats(), CacheStats::default());
}

#[tokio::test]
async fn test_reader_waits_for_writer_holding_the_lock() {
    let backend = Arc::new(GatedBackend::closed());
    let lock = ProcessLock::new();
    let writer = CacheClient::new(backend.clone(), lock.clone(), CacheConfig::default());
    let reader = CacheClient::new(backend.clone(), lock.clone(), CacheConfig::default());
    let large = incompressible();

    let write = {
        let large = large.clone();
        tokio::spawn(async move { writer.put("shared", &large, None).await })
    };
    backend.entered.notified().await;
    assert!(lock.is_locked());

    let read = tokio::spawn(async move { reader.get::<Value>("shared").await });
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!read.is_finished());

    backend.open();
    assert!(matches!(
        write.await.unwrap().unwrap(),
        StoreLayout::Multipart { .. }
    ));
    assert_eq!(read.await.unwrap().unwrap(), CacheLookup::Hit(large));
}

#[tokio::test]
async fn test_multipart_parts_fill_slots_in_order() {
    let backend = Arc::new(MemoryBackend::new());
    let client = CacheClient::with_backend(backend.clone());

    // 372,000 random hex characters: gzip keeps them near 4 bits each, so
    // the base64 blob lands between 200,000 and 300,000 characters.
    let hex: String = (0..11_625).map(|_| uuid::Uuid::new_v4().simple().to_string()).collect();
    let value = json!(hex);

    let layout = client.put("hex", &value, None).await.unwrap();
    assert_eq!(layout, StoreLayout::Multipart { parts: 3 });

    let compressed = compress(value.to_string().as_bytes(), CompressionType::Gzip).unwrap();
    let encoded_len = compressed.len().div_ceil(3) * 4;

    let index = read_index(&backend, "hex").await;
    let mut sizes = vec![];
    for key in &index.part_keys {
        sizes.push(backend.get(key).await.unwrap().unwrap().len());
    }
    assert_eq!(sizes, vec![100_000, 100_000, encoded_len - 200_000]);

    assert_eq!(client.get::<Value>("hex").await.unwrap(), CacheLookup::Hit(value));
}

#[tokio::test]
async fn test_codec_change_keeps_existing_entries_readable() {
    let backend = Arc::new(MemoryBackend::new());
    let gzip = CacheClient::with_backend(backend.clone());
    let zstd = CacheClient::new(
        backend.clone(),
        ProcessLock::new(),
        CacheConfig::default().with_compression(CompressionType::Zstd),
    );

    let medium = compressible();
    let large = incompressible();
    assert_eq!(gzip.put("medium", &medium, None).await.unwrap(), StoreLayout::Compressed);
    gzip.put("large", &large, None).await.unwrap();

    assert_eq!(zstd.get::<Value>("medium").await.unwrap(), CacheLookup::Hit(medium));
    assert_eq!(zstd.get::<Value>("large").await.unwrap(), CacheLookup::Hit(large.clone()));

    zstd.put("large", &large, None).await.unwrap();
    assert_eq!(gzip.get::<Value>("large").await.unwrap(), CacheLookup::Hit(large));
}

#[tokio::test]
async fn test_alternate_codec_and_digest() {
    let backend = Arc::new(MemoryBackend::new());
    let config = CacheConfig::default()
        .with_compression(CompressionType::Zstd)
        .with_digest(DigestAlgorithm::Sha256);
    let client = CacheClient::new(backend.clone(), ProcessLock::new(), config);
    let large = incompressible();

    client.put("large", &large, None).await.unwrap();
    assert_eq!(read_index(&backend, "large").await.checksum.len(), 44);
    assert_eq!(client.get::<Value>("large").await.unwrap(), CacheLookup::Hit(large));
}

#[tokio::test]
async fn test_filesystem_backend_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let backend = Arc::new(FilesystemBackend::new(dir.path().to_path_buf()));
    let client = CacheClient::with_backend(backend);
    let large = incompressible();

    client.put("fs", &large, None).await.unwrap();
    assert_eq!(client.get::<Value>("fs").await.unwrap(), CacheLookup::Hit(large));
}
