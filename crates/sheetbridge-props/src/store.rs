//! Property store implementations.

use async_trait::async_trait;
use sheetbridge_core::ports::PropertyStore;
use sheetbridge_core::{Error, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::sync::{Mutex, RwLock};

/// In-process property store.
#[derive(Debug, Default)]
pub struct MemoryPropertyStore {
    values: RwLock<BTreeMap<String, String>>,
}

impl MemoryPropertyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PropertyStore for MemoryPropertyStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.values.write().await.remove(key);
        Ok(())
    }

    async fn delete_all(&self) -> Result<usize> {
        let mut values = self.values.write().await;
        let removed = values.len();
        values.clear();
        Ok(removed)
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.values.read().await.keys().cloned().collect())
    }
}

/// Property store persisted as one JSON object in a file.
pub struct FilePropertyStore {
    path: PathBuf,
    // Serializes read-modify-write cycles on the file.
    io: Mutex<()>,
}

impl FilePropertyStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            io: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    async fn load(&self) -> Result<BTreeMap<String, String>> {
        match tokio::fs::read(&self.path).await {
            Ok(contents) => Ok(serde_json::from_slice(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(Error::Storage(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn persist(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let contents = serde_json::to_vec_pretty(values)?;
        tokio::fs::write(&self.path, contents).await.map_err(|e| {
            Error::Storage(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }
}

#[async_trait]
impl PropertyStore for FilePropertyStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let _io = self.io.lock().await;
        Ok(self.load().await?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _io = self.io.lock().await;
        let mut values = self.load().await?;
        values.insert(key.to_string(), value.to_string());
        self.persist(&values).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let _io = self.io.lock().await;
        let mut values = self.load().await?;
        if values.remove(key).is_some() {
            self.persist(&values).await?;
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<usize> {
        let _io = self.io.lock().await;
        let values = self.load().await?;
        if !values.is_empty() {
            self.persist(&BTreeMap::new()).await?;
        }
        Ok(values.len())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let _io = self.io.lock().await;
        Ok(self.load().await?.into_keys().collect())
    }
}
