//! Inventory of hidden notes
//!
//! CRUD over the persisted cross-page inventory collection, independent of
//! any page. Every operation reads through the gateway — nothing is cached
//! across calls, so each invocation reflects the latest persisted state.
//!
//! Addressing is positional within the current listing. Indices go stale
//! after any mutation; callers must re-`list()` before issuing another
//! index-based operation.

use crate::error::{Error, Result};
use crate::messenger::{ContextRouter, PageCommand};
use crate::note::{decode_collection, InventoryEntry, INVENTORY_KEY};
use crate::storage::PersistenceGateway;
use std::sync::Arc;

/// Read-through view over the persisted inventory collection
pub struct InventoryService {
    gateway: Arc<dyn PersistenceGateway>,
    router: Arc<ContextRouter>,
}

impl InventoryService {
    pub fn new(gateway: Arc<dyn PersistenceGateway>, router: Arc<ContextRouter>) -> Self {
        Self { gateway, router }
    }

    /// Current inventory sequence, in hide-time append order.
    /// A stored value failing the validity rule reads as empty.
    pub async fn list(&self) -> Result<Vec<InventoryEntry>> {
        Ok(match self.gateway.get(INVENTORY_KEY).await? {
            Some(value) => decode_collection(INVENTORY_KEY, value).unwrap_or_default(),
            None => Vec::new(),
        })
    }

    /// Restore the entry at `index` onto the currently active page.
    ///
    /// The bounds check happens before anything else: an out-of-range index
    /// mutates nothing and sends no command. Delivery is fire-and-forget —
    /// the entry is removed from the persisted collection whether or not the
    /// restore command reached a page context (the failure is logged). No
    /// originUrl check is made: the note restores onto whatever page is
    /// active.
    pub async fn restore(&self, index: usize) -> Result<InventoryEntry> {
        let mut entries = self.list().await?;
        if index >= entries.len() {
            return Err(Error::Bounds(format!(
                "restore index {} out of range (inventory has {} entries)",
                index,
                entries.len()
            )));
        }

        let entry = entries.remove(index);
        if let Err(e) = self
            .router
            .send_to_active(PageCommand::RestoreNote {
                note: entry.clone(),
            })
            .await
        {
            tracing::warn!("Restore command for '{}' not delivered: {}", entry.id, e);
        }

        self.persist(&entries).await?;
        Ok(entry)
    }

    /// Permanently delete the entry at `index`. Same bounds contract as
    /// [`InventoryService::restore`]; no further side effects.
    pub async fn delete(&self, index: usize) -> Result<InventoryEntry> {
        let mut entries = self.list().await?;
        if index >= entries.len() {
            return Err(Error::Bounds(format!(
                "delete index {} out of range (inventory has {} entries)",
                index,
                entries.len()
            )));
        }

        let entry = entries.remove(index);
        self.persist(&entries).await?;
        Ok(entry)
    }

    /// Permanently delete every hidden note
    pub async fn clear(&self) -> Result<()> {
        self.persist(&[]).await
    }

    /// Case-insensitive search over title, content, and origin URL.
    /// Returns matching entries paired with their current positional
    /// indices, valid until the next mutation.
    pub async fn search(&self, term: &str) -> Result<Vec<(usize, InventoryEntry)>> {
        let term = term.to_lowercase();
        let term = term.trim();
        Ok(self
            .list()
            .await?
            .into_iter()
            .enumerate()
            .filter(|(_, entry)| {
                entry.title.to_lowercase().contains(term)
                    || entry.content.to_lowercase().contains(term)
                    || entry.origin_url.to_lowercase().contains(term)
            })
            .collect())
    }

    async fn persist(&self, entries: &[InventoryEntry]) -> Result<()> {
        self.gateway
            .set(INVENTORY_KEY, serde_json::to_value(entries)?)
            .await
    }
}
