//! The persistence gateway trait

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;

/// The full persisted state: storage key → collection value
pub type Namespace = BTreeMap<String, Value>;

/// Opaque asynchronous key-value store.
///
/// Callers must treat the interval between issuing a write and its
/// completion as a window where a concurrent read from another context may
/// observe stale data. There is no locking: the required discipline is to
/// re-derive every write from the freshest in-memory snapshot of the full
/// collection, never from partial deltas.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Read one key, `None` if absent
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Read the entire namespace
    async fn get_all(&self) -> Result<Namespace>;

    /// Overwrite one key with a full value
    async fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Remove one key; absent keys are not an error
    async fn remove(&self, key: &str) -> Result<()>;

    /// Drop the entire namespace
    async fn clear(&self) -> Result<()>;
}
