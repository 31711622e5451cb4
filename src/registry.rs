//! Page note registry
//!
//! Owns the set of notes currently live for one page identity and mediates
//! every create/edit/recolor/move-to-inventory operation. Each mutation
//! re-persists the full page collection immediately; there is no batching
//! and no debouncing, so a keystroke-level edit is an independent persisted
//! write.
//!
//! In-memory state is authoritative when the gateway is unavailable: a
//! failed persist is logged and the next successful full-collection write
//! subsumes it. The one exception is [`PageNoteRegistry::move_to_inventory`],
//! which must not shrink the page's persisted state unless the inventory
//! append was confirmed first.

use crate::config::LayoutConfig;
use crate::error::{Error, Result};
use crate::messenger::PageCommand;
use crate::note::{
    decode_collection, new_note_id, page_storage_key, InventoryEntry, NoteDraft, NoteRecord,
    Position, INVENTORY_KEY, PALETTE_LEN,
};
use crate::storage::PersistenceGateway;
use chrono::Utc;
use rand::Rng;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A typed `(field, value)` pair for note edits
#[derive(Debug, Clone)]
pub enum NoteEdit {
    Title(String),
    Content(String),
    /// Clamped to 0 if out of palette bounds
    ColorIndex(usize),
}

/// In-memory collection of the notes live on one page
pub struct PageNoteRegistry {
    page_url: String,
    storage_key: String,
    layout: LayoutConfig,
    gateway: Arc<dyn PersistenceGateway>,
    notes: Arc<RwLock<Vec<NoteRecord>>>,
}

impl PageNoteRegistry {
    /// Create an empty registry for one page identity
    pub fn new(
        page_url: impl Into<String>,
        gateway: Arc<dyn PersistenceGateway>,
        layout: LayoutConfig,
    ) -> Self {
        let page_url = page_url.into();
        let storage_key = page_storage_key(&page_url);
        Self {
            page_url,
            storage_key,
            layout,
            gateway,
            notes: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Page identity this registry serves
    pub fn page_url(&self) -> &str {
        &self.page_url
    }

    /// Materialize the persisted page collection, replacing in-memory state.
    ///
    /// A stored value failing the validity rule is dropped wholesale and the
    /// page starts empty. Returns the number of notes loaded.
    pub async fn load(&self) -> Result<usize> {
        let loaded: Vec<NoteRecord> = match self.gateway.get(&self.storage_key).await? {
            Some(value) => decode_collection(&self.storage_key, value).unwrap_or_default(),
            None => Vec::new(),
        };
        let count = loaded.len();
        *self.notes.write().await = loaded;
        Ok(count)
    }

    /// Current in-memory view (render seam)
    pub async fn snapshot(&self) -> Vec<NoteRecord> {
        self.notes.read().await.clone()
    }

    /// Create a note and persist the grown page collection.
    ///
    /// An omitted position is chosen pseudo-randomly so the note stays fully
    /// on-screen at default note size; overlap with existing notes is
    /// permitted. An omitted id is freshly generated; an explicit id that
    /// already exists on this page is rejected.
    pub async fn create(&self, draft: NoteDraft) -> Result<NoteRecord> {
        let note = NoteRecord {
            id: draft.id.unwrap_or_else(new_note_id),
            title: draft.title,
            content: draft.content,
            position: draft
                .position
                .unwrap_or_else(|| random_position(&self.layout)),
            color_index: clamp_color(draft.color_index),
        };

        let mut notes = self.notes.write().await;
        if notes.iter().any(|n| n.id == note.id) {
            return Err(Error::Validation(format!(
                "note id '{}' already exists on this page",
                note.id
            )));
        }
        notes.push(note.clone());
        self.persist_page(&notes).await;
        Ok(note)
    }

    /// Apply an in-place field mutation and re-persist the page collection
    pub async fn edit(&self, id: &str, edit: NoteEdit) -> Result<NoteRecord> {
        let mut notes = self.notes.write().await;
        let note = notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| Error::Bounds(format!("no note with id '{}' on this page", id)))?;

        match edit {
            NoteEdit::Title(title) => note.title = title,
            NoteEdit::Content(content) => note.content = content,
            NoteEdit::ColorIndex(index) => note.color_index = clamp_color(index),
        }

        let updated = note.clone();
        self.persist_page(&notes).await;
        Ok(updated)
    }

    /// Record the final position of a drag gesture and persist it.
    /// Intermediate drag frames never reach the registry.
    pub async fn reposition(&self, id: &str, position: Position) -> Result<NoteRecord> {
        let mut notes = self.notes.write().await;
        let note = notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| Error::Bounds(format!("no note with id '{}' on this page", id)))?;

        note.position = position;
        let updated = note.clone();
        self.persist_page(&notes).await;
        Ok(updated)
    }

    /// Move a note into the cross-page inventory.
    ///
    /// Ordering contract: the inventory append is issued and confirmed
    /// before the shrunken page collection is written. If the append fails,
    /// the note is reinstated at its original index and nothing is
    /// observably applied.
    pub async fn move_to_inventory(&self, id: &str) -> Result<InventoryEntry> {
        let mut notes = self.notes.write().await;
        let index = notes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| Error::Bounds(format!("no note with id '{}' on this page", id)))?;

        let note = notes.remove(index);
        let entry = InventoryEntry::hidden_from(note.clone(), &self.page_url, Utc::now());

        if let Err(e) = self.append_inventory(&entry).await {
            notes.insert(index, note);
            return Err(e);
        }

        self.persist_page(&notes).await;
        Ok(entry)
    }

    /// Process a cross-context command
    pub async fn handle_command(&self, command: PageCommand) {
        match command {
            PageCommand::RestoreNote { note } => {
                let draft = NoteDraft {
                    content: note.content.clone(),
                    title: note.title.clone(),
                    position: Some(note.position),
                    color_index: note.color_index,
                    id: Some(note.id.clone()),
                };
                if let Err(e) = self.create(draft).await {
                    tracing::warn!("Failed to materialize restored note '{}': {}", note.id, e);
                }
            }
            PageCommand::Reload => {
                if let Err(e) = self.load().await {
                    tracing::warn!("Failed to reload page {}: {}", self.page_url, e);
                }
            }
        }
    }

    /// Write the full page collection through the gateway, degrading
    /// gracefully: a failure leaves in-memory state authoritative and is
    /// retried implicitly by the next mutation's full re-persist.
    async fn persist_page(&self, notes: &[NoteRecord]) {
        let value = match serde_json::to_value(notes) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to serialize page collection {}: {}", self.page_url, e);
                return;
            }
        };
        if let Err(e) = self.gateway.set(&self.storage_key, value).await {
            tracing::warn!("Failed to persist page collection {}: {}", self.page_url, e);
        }
    }

    /// Append one entry to the persisted inventory collection.
    /// A stored inventory failing the validity rule is dropped wholesale.
    async fn append_inventory(&self, entry: &InventoryEntry) -> Result<()> {
        let mut entries: Vec<InventoryEntry> = match self.gateway.get(INVENTORY_KEY).await? {
            Some(value) => decode_collection(INVENTORY_KEY, value).unwrap_or_default(),
            None => Vec::new(),
        };
        entries.push(entry.clone());
        self.gateway
            .set(INVENTORY_KEY, serde_json::to_value(&entries)?)
            .await
    }
}

fn clamp_color(index: usize) -> usize {
    if index < PALETTE_LEN {
        index
    } else {
        0
    }
}

fn random_position(layout: &LayoutConfig) -> Position {
    let mut rng = rand::thread_rng();
    let max_x = (layout.viewport_width - layout.note_width).max(0.0);
    let max_y = (layout.viewport_height - layout.note_height).max(0.0);
    Position {
        x: rng.gen_range(0.0..=max_x),
        y: rng.gen_range(0.0..=max_y),
    }
}
