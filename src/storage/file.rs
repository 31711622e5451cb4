//! File-backed persistence gateway
//!
//! The whole namespace lives in one pretty-printed JSON document
//! (`<data_dir>/namespace.json`). Every write rewrites the document through
//! a temp-file-then-rename, so a crash mid-write never leaves a torn file.
//! A missing file reads as the empty namespace; an unparseable file is
//! logged and treated as empty rather than panicking.

use crate::error::Result;
use crate::storage::{Namespace, PersistenceGateway};
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};

const NAMESPACE_FILE: &str = "namespace.json";

/// JSON-file-backed gateway
pub struct FileGateway {
    path: PathBuf,
}

impl FileGateway {
    /// Create a gateway persisting under `data_dir`
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(NAMESPACE_FILE),
        }
    }

    /// Path of the namespace document
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Namespace> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(namespace) => Ok(namespace),
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse {}: {} (treating as empty)",
                        self.path.display(),
                        e
                    );
                    Ok(Namespace::new())
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Namespace::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn store(&self, namespace: &Namespace) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(namespace)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl PersistenceGateway for FileGateway {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.load().await?.remove(key))
    }

    async fn get_all(&self) -> Result<Namespace> {
        self.load().await
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut namespace = self.load().await?;
        namespace.insert(key.to_string(), value);
        self.store(&namespace).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut namespace = self.load().await?;
        if namespace.remove(key).is_some() {
            self.store(&namespace).await?;
        }
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.store(&Namespace::new()).await
    }
}
