//! Process-scoped advisory lock serializing cache operations.

use sheetbridge_core::{Error, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, trace};

/// A mutual-exclusion lock shared by every cache client in one process
/// context. Clones share the same underlying lock.
#[derive(Debug, Clone, Default)]
pub struct ProcessLock {
    inner: Arc<Mutex<()>>,
}

impl ProcessLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock, waiting at most `timeout`.
    pub async fn acquire(&self, timeout: Duration) -> Result<LockGuard> {
        match tokio::time::timeout(timeout, self.inner.clone().lock_owned()).await {
            Ok(guard) => {
                trace!("Process lock acquired");
                Ok(LockGuard { _guard: guard })
            }
            Err(_) => {
                debug!(timeout_ms = timeout.as_millis() as u64, "Process lock wait timed out");
                Err(Error::LockTimeout {
                    waited_ms: timeout.as_millis() as u64,
                })
            }
        }
    }

    /// Whether another caller currently holds the lock.
    pub fn is_locked(&self) -> bool {
        self.inner.try_lock().is_err()
    }
}

/// Holds the process lock until dropped.
#[derive(Debug)]
pub struct LockGuard {
    _guard: OwnedMutexGuard<()>,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        trace!("Process lock released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_acquire_and_release() {
        let lock = ProcessLock::new();
        let guard = lock.acquire(Duration::from_millis(50)).await.unwrap();
        assert!(lock.is_locked());
        drop(guard);
        assert!(!lock.is_locked());
    }

    #[tokio::test]
    async fn test_timeout_while_held_by_clone() {
        let lock = ProcessLock::new();
        let other = lock.clone();
        let _held = other.acquire(Duration::from_millis(50)).await.unwrap();

        let err = lock.acquire(Duration::from_millis(20)).await.unwrap_err();
        assert!(matches!(err, Error::LockTimeout { waited_ms: 20 }));
    }

    #[tokio::test]
    async fn test_waiter_proceeds_after_release() {
        let lock = ProcessLock::new();
        let held = lock.acquire(Duration::from_millis(50)).await.unwrap();

        let waiter = {
            let lock = lock.clone();
            tokio::spawn(async move { lock.acquire(Duration::from_secs(2)).await.is_ok() })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(held);

        assert!(waiter.await.unwrap());
    }
}
