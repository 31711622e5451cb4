//! Whole-namespace export and import
//!
//! Export serializes every persisted collection that passes the validity
//! rule into one portable document. Import is a hard replace: after an
//! all-or-nothing validation pass, the entire persisted namespace is cleared
//! and the clean import set is written as the new namespace. A crash between
//! the clear and the writes leaves the store empty — an accepted risk, as
//! the gateway offers no multi-key transaction.
//!
//! Confirmation of the (destructive) import is the caller's duty; the
//! service itself never prompts. Use [`ImportExportService::preview`] to
//! obtain the counts a confirmation prompt should show.

use crate::error::{Error, Result};
use crate::messenger::{ContextRouter, PageCommand};
use crate::note::{is_page_key, is_valid_collection, INVENTORY_KEY};
use crate::storage::{Namespace, PersistenceGateway};
use serde_json::Value;
use std::sync::Arc;

/// What an import document would apply, for confirmation prompts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPreview {
    /// Number of page collections in the document
    pub page_count: usize,
    /// Total notes across all page collections
    pub note_count: usize,
    /// Number of hidden notes in the document's inventory
    pub inventory_count: usize,
}

/// Outcome of a completed import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    /// Keys written as the new namespace
    pub keys_written: usize,
}

/// Export/import over the full persisted namespace
pub struct ImportExportService {
    gateway: Arc<dyn PersistenceGateway>,
    router: Arc<ContextRouter>,
}

impl ImportExportService {
    pub fn new(gateway: Arc<dyn PersistenceGateway>, router: Arc<ContextRouter>) -> Self {
        Self { gateway, router }
    }

    /// Produce a portable snapshot of the namespace.
    ///
    /// Retains only the inventory key and page-shaped keys whose values pass
    /// the validity rule; foreign keys are ignored. An empty retained set is
    /// an error — there is nothing to export.
    pub async fn export(&self) -> Result<Namespace> {
        let mut namespace = self.gateway.get_all().await?;
        namespace.retain(|key, value| is_retained_key(key) && is_valid_collection(value));

        if namespace.is_empty() {
            return Err(Error::Validation("no notes found to export".to_string()));
        }
        Ok(namespace)
    }

    /// Validate an import document without applying anything.
    ///
    /// The document must be a mapping; every key must be the inventory key
    /// or page-shaped, and every value must pass the validity rule. Any
    /// violation rejects the entire document — partial imports are never
    /// applied.
    pub fn preview(&self, document: &Value) -> Result<ImportPreview> {
        let Some(map) = document.as_object() else {
            return Err(Error::Validation(
                "import document must be a mapping of storage keys to collections".to_string(),
            ));
        };

        let mut preview = ImportPreview {
            page_count: 0,
            note_count: 0,
            inventory_count: 0,
        };

        for (key, value) in map {
            if !is_retained_key(key) {
                return Err(Error::Validation(format!(
                    "unrecognized key '{}' in import document",
                    key
                )));
            }
            if !is_valid_collection(value) {
                return Err(Error::Validation(format!(
                    "invalid notes collection under key '{}'",
                    key
                )));
            }
            let len = value.as_array().map(Vec::len).unwrap_or(0);
            if key == INVENTORY_KEY {
                preview.inventory_count = len;
            } else {
                preview.page_count += 1;
                preview.note_count += len;
            }
        }

        Ok(preview)
    }

    /// Replace the entire persisted namespace with the document's contents.
    ///
    /// Validates (and defensively re-filters) first; nothing is touched on
    /// rejection. On success the consuming page context is told to reload so
    /// its in-memory registry resynchronizes; a delivery failure there does
    /// not fail the import.
    pub async fn import(&self, document: Value) -> Result<ImportOutcome> {
        self.preview(&document)?;

        // Defensive re-check: rebuild the clean set through the same
        // per-key rule the structural pass used
        let mut clean = Namespace::new();
        if let Some(map) = document.as_object() {
            for (key, value) in map {
                if is_retained_key(key) && is_valid_collection(value) {
                    clean.insert(key.clone(), value.clone());
                }
            }
        }

        if clean.is_empty() {
            return Err(Error::Validation(
                "no valid notes found in import document".to_string(),
            ));
        }

        let keys_written = clean.len();
        self.gateway.clear().await?;
        for (key, value) in clean {
            self.gateway.set(&key, value).await?;
        }

        if let Err(e) = self.router.send_to_active(PageCommand::Reload).await {
            tracing::warn!("Post-import reload signal not delivered: {}", e);
        }

        Ok(ImportOutcome { keys_written })
    }
}

/// File name for an export taken on `date` (`sticky-notes-YYYY-MM-DD.json`)
pub fn export_file_name(date: chrono::NaiveDate) -> String {
    format!("sticky-notes-{}.json", date.format("%Y-%m-%d"))
}

fn is_retained_key(key: &str) -> bool {
    key == INVENTORY_KEY || is_page_key(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::messenger;
    use crate::registry::PageNoteRegistry;
    use crate::storage::MemoryGateway;
    use serde_json::json;

    fn make_service() -> (ImportExportService, Arc<MemoryGateway>, Arc<ContextRouter>) {
        let gateway = Arc::new(MemoryGateway::new());
        let router = Arc::new(ContextRouter::new());
        let service = ImportExportService::new(gateway.clone(), router.clone());
        (service, gateway, router)
    }

    async fn seed_mixed_namespace(gateway: &MemoryGateway) {
        gateway
            .set("notes_https://x.test/", json!([{"content": "buy milk"}]))
            .await
            .unwrap();
        gateway
            .set("inventory", json!([{"title": "hidden", "originUrl": "https://x.test/"}]))
            .await
            .unwrap();
        // Page-shaped key with an invalid value
        gateway
            .set("notes_https://bad.test/", json!({"not": "a sequence"}))
            .await
            .unwrap();
        // Foreign key
        gateway.set("settings", json!({"theme": "dark"})).await.unwrap();
    }

    #[tokio::test]
    async fn test_export_retains_only_valid_note_keys() {
        let (service, gateway, _router) = make_service();
        seed_mixed_namespace(&gateway).await;

        let exported = service.export().await.unwrap();
        assert_eq!(exported.len(), 2);
        assert!(exported.contains_key("notes_https://x.test/"));
        assert!(exported.contains_key("inventory"));
        assert!(!exported.contains_key("notes_https://bad.test/"));
        assert!(!exported.contains_key("settings"));
    }

    #[tokio::test]
    async fn test_export_empty_namespace_is_an_error() {
        let (service, _gateway, _router) = make_service();
        assert!(matches!(
            service.export().await,
            Err(Error::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_export_with_only_invalid_data_is_an_error() {
        let (service, gateway, _router) = make_service();
        gateway
            .set("notes_https://bad.test/", json!("garbage"))
            .await
            .unwrap();
        gateway.set("settings", json!({})).await.unwrap();

        assert!(matches!(
            service.export().await,
            Err(Error::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_hidden_note_appears_only_in_inventory_key() {
        // Hide a note, then export: the document carries the inventory entry
        // with its origin, and no page entry for the hidden note.
        let gateway = Arc::new(MemoryGateway::new());
        let router = Arc::new(ContextRouter::new());
        let registry =
            PageNoteRegistry::new("https://x.test/", gateway.clone(), LayoutConfig::default());

        let note = registry
            .create(crate::note::NoteDraft::with_content("buy milk"))
            .await
            .unwrap();
        registry.move_to_inventory(&note.id).await.unwrap();

        let service = ImportExportService::new(gateway, router);
        let exported = service.export().await.unwrap();

        let inventory = exported.get("inventory").unwrap();
        assert_eq!(inventory[0]["originUrl"], "https://x.test/");
        assert_eq!(inventory[0]["id"], note.id.as_str());

        // The page key survives as an empty collection with no trace of the
        // hidden note
        let page = exported.get("notes_https://x.test/").unwrap();
        assert_eq!(page, &json!([]));
    }

    #[tokio::test]
    async fn test_preview_counts() {
        let (service, _gateway, _router) = make_service();
        let document = json!({
            "notes_https://x.test/": [{"content": "a"}, {"content": "b"}],
            "notes_https://y.test/": [{"title": "c"}],
            "inventory": [{"title": "hidden"}]
        });

        let preview = service.preview(&document).unwrap();
        assert_eq!(
            preview,
            ImportPreview {
                page_count: 2,
                note_count: 3,
                inventory_count: 1
            }
        );
    }

    #[tokio::test]
    async fn test_preview_rejects_non_mapping() {
        let (service, _gateway, _router) = make_service();
        for document in [json!([]), json!("x"), json!(null)] {
            assert!(matches!(
                service.preview(&document),
                Err(Error::Validation(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_preview_rejects_foreign_key() {
        let (service, _gateway, _router) = make_service();
        let document = json!({
            "notes_https://x.test/": [{"content": "ok"}],
            "settings": [{"content": "smuggled"}]
        });
        assert!(matches!(
            service.preview(&document),
            Err(Error::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_import_rejects_document_with_invalid_collection() {
        let (service, gateway, _router) = make_service();
        seed_mixed_namespace(&gateway).await;
        let before = gateway.get_all().await.unwrap();

        // A document whose only key holds an invalid value is rejected
        // wholesale, and nothing is touched
        let document = json!({"notes_https://x.test/": [{"id": "no title or content"}]});
        assert!(matches!(
            service.import(document).await,
            Err(Error::Validation(_))
        ));
        assert_eq!(gateway.get_all().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_import_empty_document_is_an_error() {
        let (service, gateway, _router) = make_service();
        seed_mixed_namespace(&gateway).await;
        let before = gateway.get_all().await.unwrap();

        assert!(matches!(
            service.import(json!({})).await,
            Err(Error::Validation(_))
        ));
        assert_eq!(gateway.get_all().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_import_replaces_entire_namespace() {
        let (service, gateway, _router) = make_service();
        seed_mixed_namespace(&gateway).await;

        let outcome = service
            .import(json!({"inventory": [{"title": "only survivor"}]}))
            .await
            .unwrap();
        assert_eq!(outcome.keys_written, 1);

        // Everything that was not in the document is gone, including other
        // pages' notes and foreign keys
        let namespace = gateway.get_all().await.unwrap();
        assert_eq!(namespace.len(), 1);
        assert_eq!(
            namespace.get("inventory").unwrap()[0]["title"],
            "only survivor"
        );
    }

    #[tokio::test]
    async fn test_import_export_round_trip() {
        let (service, gateway, _router) = make_service();
        gateway
            .set(
                "notes_https://x.test/",
                json!([{"id": "note-1", "content": "a"}, {"id": "note-2", "title": "b"}]),
            )
            .await
            .unwrap();
        gateway
            .set("inventory", json!([{"title": "hidden", "originUrl": "https://x.test/"}]))
            .await
            .unwrap();

        let exported = service.export().await.unwrap();
        service
            .import(serde_json::to_value(&exported).unwrap())
            .await
            .unwrap();

        // Same keys, same collection contents, order preserved
        let after = gateway.get_all().await.unwrap();
        assert_eq!(after, exported);
    }

    #[tokio::test]
    async fn test_import_aborts_on_storage_failure() {
        let (service, gateway, _router) = make_service();
        seed_mixed_namespace(&gateway).await;
        let before = gateway.get_all().await.unwrap();

        gateway.set_fail_writes(true);
        let result = service
            .import(json!({"inventory": [{"title": "x"}]}))
            .await;
        assert!(matches!(result, Err(Error::Storage(_))));
        gateway.set_fail_writes(false);

        // The clear itself failed, so the namespace is untouched
        assert_eq!(gateway.get_all().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_import_signals_active_page_to_reload() {
        let gateway = Arc::new(MemoryGateway::new());
        let router = Arc::new(ContextRouter::new());
        gateway
            .set("notes_https://x.test/", json!([{"content": "stale"}]))
            .await
            .unwrap();

        let registry = Arc::new(PageNoteRegistry::new(
            "https://x.test/",
            gateway.clone(),
            LayoutConfig::default(),
        ));
        registry.load().await.unwrap();
        let receiver = router.register("tab-1").await;
        router.set_active("tab-1").await;
        let _loop_task = messenger::attach(registry.clone(), receiver);

        let service = ImportExportService::new(gateway, router);
        service
            .import(json!({"notes_https://x.test/": [{"content": "imported"}]}))
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        let notes = registry.snapshot().await;
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].content, "imported");
    }

    #[test]
    fn test_export_file_name_is_date_stamped() {
        let date = chrono::NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        assert_eq!(export_file_name(date), "sticky-notes-2026-08-07.json");
    }
}
