//! Cross-context command channel
//!
//! One-shot commands flow from the management surface to a live page
//! context. Delivery is fire-and-forget: there is no acknowledgment, and a
//! send with no addressable context fails with a delivery error that callers
//! log and (per contract) proceed past.
//!
//! ## Wire form
//!
//! - Restore: `{ "action": "restoreNote", "note": <InventoryEntry> }`
//! - Reload:  `{ "action": "reload" }`

use crate::error::{Error, Result};
use crate::note::InventoryEntry;
use crate::registry::PageNoteRegistry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

/// Command delivered to a page context
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum PageCommand {
    /// Materialize a restored note on the receiving page, reusing its id
    RestoreNote { note: InventoryEntry },
    /// Resynchronize the page registry from the store (sent after import)
    Reload,
}

/// Registry of live page contexts, one of which may be active.
///
/// Each registered context owns the receiving half of an unbounded channel;
/// [`attach`] pumps that channel into a [`PageNoteRegistry`].
#[derive(Default)]
pub struct ContextRouter {
    contexts: RwLock<HashMap<String, mpsc::UnboundedSender<PageCommand>>>,
    active: RwLock<Option<String>>,
}

impl ContextRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page context, returning its command receiver.
    /// Re-registering a context id replaces the previous channel.
    pub async fn register(&self, context_id: &str) -> mpsc::UnboundedReceiver<PageCommand> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.contexts
            .write()
            .await
            .insert(context_id.to_string(), tx);
        rx
    }

    /// Remove a page context
    pub async fn unregister(&self, context_id: &str) {
        self.contexts.write().await.remove(context_id);
        let mut active = self.active.write().await;
        if active.as_deref() == Some(context_id) {
            *active = None;
        }
    }

    /// Mark the context commands are addressed to
    pub async fn set_active(&self, context_id: &str) {
        *self.active.write().await = Some(context_id.to_string());
    }

    /// Currently active context id, if any
    pub async fn active(&self) -> Option<String> {
        self.active.read().await.clone()
    }

    /// Send a command to the active page context, fire-and-forget.
    ///
    /// Fails with a delivery error if no context is active, the active
    /// context is not registered, or its receiver is gone. No retry.
    pub async fn send_to_active(&self, command: PageCommand) -> Result<()> {
        let active = self.active.read().await.clone();
        let Some(context_id) = active else {
            return Err(Error::Delivery("no active page context".to_string()));
        };

        let contexts = self.contexts.read().await;
        let Some(tx) = contexts.get(&context_id) else {
            return Err(Error::Delivery(format!(
                "active context '{}' is not registered",
                context_id
            )));
        };

        tx.send(command).map_err(|_| {
            Error::Delivery(format!("page context '{}' is no longer listening", context_id))
        })
    }
}

/// Spawn the delivery loop feeding a context's commands into its registry.
///
/// The task ends when the sending half is dropped (context unregistered or
/// router gone).
pub fn attach(
    registry: Arc<PageNoteRegistry>,
    mut receiver: mpsc::UnboundedReceiver<PageCommand>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(command) = receiver.recv().await {
            registry.handle_command(command).await;
        }
        tracing::debug!("Command channel for {} closed", registry.page_url());
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::Position;
    use chrono::Utc;

    fn sample_entry() -> InventoryEntry {
        InventoryEntry {
            id: "note-1".to_string(),
            title: "t".to_string(),
            content: "c".to_string(),
            position: Position::new(1.0, 2.0),
            color_index: 2,
            origin_url: "https://x.test/".to_string(),
            hidden_at: Utc::now(),
        }
    }

    #[test]
    fn test_command_wire_shape() {
        let json = serde_json::to_value(PageCommand::RestoreNote {
            note: sample_entry(),
        })
        .unwrap();
        assert_eq!(json["action"], "restoreNote");
        assert_eq!(json["note"]["id"], "note-1");

        let json = serde_json::to_value(PageCommand::Reload).unwrap();
        assert_eq!(json["action"], "reload");

        let parsed: PageCommand = serde_json::from_value(serde_json::json!({
            "action": "restoreNote",
            "note": {"content": "c"}
        }))
        .unwrap();
        assert!(matches!(parsed, PageCommand::RestoreNote { .. }));
    }

    #[tokio::test]
    async fn test_send_without_active_context_fails() {
        let router = ContextRouter::new();
        let result = router.send_to_active(PageCommand::Reload).await;
        assert!(matches!(result, Err(Error::Delivery(_))));
    }

    #[tokio::test]
    async fn test_send_to_active_context() {
        let router = ContextRouter::new();
        let mut rx = router.register("tab-1").await;
        router.set_active("tab-1").await;

        router.send_to_active(PageCommand::Reload).await.unwrap();
        assert!(matches!(rx.recv().await, Some(PageCommand::Reload)));
    }

    #[tokio::test]
    async fn test_send_after_unregister_fails() {
        let router = ContextRouter::new();
        let _rx = router.register("tab-1").await;
        router.set_active("tab-1").await;
        router.unregister("tab-1").await;

        assert!(router.active().await.is_none());
        let result = router.send_to_active(PageCommand::Reload).await;
        assert!(matches!(result, Err(Error::Delivery(_))));
    }

    #[tokio::test]
    async fn test_send_to_dropped_receiver_fails() {
        let router = ContextRouter::new();
        let rx = router.register("tab-1").await;
        router.set_active("tab-1").await;
        drop(rx);

        let result = router.send_to_active(PageCommand::Reload).await;
        assert!(matches!(result, Err(Error::Delivery(_))));
    }

    #[tokio::test]
    async fn test_reregister_replaces_channel() {
        let router = ContextRouter::new();
        let _old = router.register("tab-1").await;
        let mut new = router.register("tab-1").await;
        router.set_active("tab-1").await;

        router.send_to_active(PageCommand::Reload).await.unwrap();
        assert!(new.recv().await.is_some());
    }
}
