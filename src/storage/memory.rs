//! In-memory persistence gateway
//!
//! Backs tests and ephemeral contexts. Reads and writes can be made to fail
//! on demand so the storage-unavailable paths are exercisable.

use crate::error::{Error, Result};
use crate::storage::{Namespace, PersistenceGateway};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// Map-backed gateway with failure injection
#[derive(Default)]
pub struct MemoryGateway {
    data: RwLock<Namespace>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent reads fail with a storage error
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent writes fail with a storage error
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_read(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            Err(Error::Storage("gateway unavailable for reads".to_string()))
        } else {
            Ok(())
        }
    }

    fn check_write(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(Error::Storage("gateway unavailable for writes".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PersistenceGateway for MemoryGateway {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        self.check_read()?;
        Ok(self.data.read().await.get(key).cloned())
    }

    async fn get_all(&self) -> Result<Namespace> {
        self.check_read()?;
        Ok(self.data.read().await.clone())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.check_write()?;
        self.data.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.check_write()?;
        self.data.write().await.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.check_write()?;
        self.data.write().await.clear();
        Ok(())
    }
}
