//! Note wire types
//!
//! All types use camelCase JSON serialization so the persisted form matches
//! the portable export document format. Decoding is deliberately tolerant:
//! missing fields fall back to defaults and an out-of-palette color index
//! clamps to 0, so partially shaped records survive a reload instead of
//! poisoning the whole collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Fixed, ordered color palette. `colorIndex` on a note indexes into this.
pub const PALETTE: [&str; 5] = ["#ffffa0", "#ffb6c1", "#add8e6", "#98fb98", "#e6e6fa"];

/// Number of palette entries
pub const PALETTE_LEN: usize = PALETTE.len();

/// Generate a fresh note id (`note-<uuid>`)
pub fn new_note_id() -> String {
    format!("note-{}", uuid::Uuid::new_v4())
}

/// Top-left anchor of a note in page-local pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A note currently live on one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRecord {
    /// Stable identifier, assigned at creation, never reused
    #[serde(default = "new_note_id")]
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub position: Position,

    /// Index into [`PALETTE`]; out-of-bounds values decode as 0
    #[serde(default, deserialize_with = "de_color_index")]
    pub color_index: usize,
}

impl NoteRecord {
    /// Palette color for this note
    pub fn color(&self) -> &'static str {
        PALETTE[self.color_index.min(PALETTE_LEN - 1)]
    }
}

/// Input for creating a note; unset fields are filled in by the registry
#[derive(Debug, Clone, Default)]
pub struct NoteDraft {
    pub content: String,
    pub title: String,
    /// Omitted: a pseudo-random on-screen position is chosen
    pub position: Option<Position>,
    /// Clamped to 0 if out of palette bounds
    pub color_index: usize,
    /// Omitted: a fresh id is generated
    pub id: Option<String>,
}

impl NoteDraft {
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }
}

/// A hidden note in the cross-page inventory collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryEntry {
    #[serde(default = "new_note_id")]
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub position: Position,

    #[serde(default, deserialize_with = "de_color_index")]
    pub color_index: usize,

    /// Full URL of the page the note was hidden from
    #[serde(default)]
    pub origin_url: String,

    /// Moment of hiding, ISO-8601
    #[serde(default = "Utc::now")]
    pub hidden_at: DateTime<Utc>,
}

impl InventoryEntry {
    /// Convert a live note into an inventory entry, stamping the origin page
    /// and the hide time.
    pub fn hidden_from(note: NoteRecord, origin_url: &str, hidden_at: DateTime<Utc>) -> Self {
        Self {
            id: note.id,
            title: note.title,
            content: note.content,
            position: note.position,
            color_index: note.color_index,
            origin_url: origin_url.to_string(),
            hidden_at,
        }
    }

    /// Convert back into a live note, dropping the inventory-only fields
    pub fn into_note(self) -> NoteRecord {
        NoteRecord {
            id: self.id,
            title: self.title,
            content: self.content,
            position: self.position,
            color_index: self.color_index,
        }
    }
}

/// Decode a color index, clamping anything outside the palette to 0.
/// Accepts any JSON number (the loose validity rule admits them).
fn de_color_index<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if raw.is_finite() && raw >= 0.0 && raw < PALETTE_LEN as f64 {
        Ok(raw as usize)
    } else {
        Ok(0)
    }
}
