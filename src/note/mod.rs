//! Note schema and collection validation
//!
//! Defines the canonical on-disk shape of a note and of an inventory entry,
//! the fixed color palette, page-key derivation, and the loose validity rule
//! applied to stored and imported collections.

mod types;
mod validate;

pub use types::{
    new_note_id, InventoryEntry, NoteDraft, NoteRecord, Position, PALETTE, PALETTE_LEN,
};
pub use validate::{decode_collection, is_page_key, is_valid_collection, page_storage_key};

/// Reserved storage key for the cross-page inventory collection.
pub const INVENTORY_KEY: &str = "inventory";
