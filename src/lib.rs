//! StickVault - page-scoped sticky notes with a cross-page inventory
//!
//! StickVault attaches free-form annotated notes to web pages, persists them
//! keyed by page identity, and moves notes between an "active on page" state
//! and a cross-page inventory of hidden notes, with bulk export/import of
//! the whole note corpus as a portable JSON file.
//!
//! The crate is the note lifecycle and persistence-synchronization engine:
//! how a note is created, mutated, relocated between the visible and
//! inventory collections, serialized to and from the key-value store, and
//! replaced wholesale during import. Rendering, drag mechanics, and popup
//! chrome are external collaborators; they only supply field values (edits,
//! drag-end positions) and consume [`registry::PageNoteRegistry::snapshot`].
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────┐      ┌─────────────────────────────┐
//! │       Page context         │      │     Management surface      │
//! │  ┌──────────────────────┐  │      │  ┌───────────────────────┐  │
//! │  │   PageNoteRegistry   │◄─┼──────┼──│   InventoryService    │  │
//! │  │  create/edit/hide    │  │ cmds │  │  list/restore/delete  │  │
//! │  └──────────┬───────────┘  │      │  └───────────┬───────────┘  │
//! │             │              │      │  ┌───────────┴───────────┐  │
//! │             │              │      │  │  ImportExportService  │  │
//! │             │              │      │  └───────────┬───────────┘  │
//! └─────────────┼──────────────┘      └──────────────┼──────────────┘
//!               │                                    │
//!               ▼                                    ▼
//!        ┌─────────────────────────────────────────────────┐
//!        │       PersistenceGateway (async KV store)       │
//!        │   notes_<pageKey> → [NoteRecord]                │
//!        │   inventory       → [InventoryEntry]            │
//!        └─────────────────────────────────────────────────┘
//! ```
//!
//! Every persisted write is a full-value overwrite re-derived from the
//! writer's in-memory snapshot; across contexts the last completed write
//! wins. There is no locking and no multi-key transaction.
//!
//! ## Modules
//!
//! - [`note`]: record schema, palette, key shapes, collection validity
//! - [`storage`]: the gateway trait plus file and in-memory backends
//! - [`registry`]: the per-page note collection and its mutations
//! - [`inventory`]: the cross-page collection of hidden notes
//! - [`messenger`]: one-shot commands into live page contexts
//! - [`transfer`]: whole-namespace export and hard-replace import
//! - [`config`]: configuration management

pub mod config;
pub mod error;
pub mod inventory;
pub mod messenger;
pub mod note;
pub mod registry;
pub mod storage;
pub mod transfer;

pub use config::StickVaultConfig;
pub use error::{Error, Result};
