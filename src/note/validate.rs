//! Collection validity and storage key shapes
//!
//! A stored or imported value is accepted per key, wholesale: either the
//! whole collection passes the (deliberately loose) validity rule or the
//! whole key's data is dropped. This is not full schema validation.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Prefix of per-page storage keys
const PAGE_KEY_PREFIX: &str = "notes_";

/// Storage key for a page's note collection (`notes_<pageKey>`)
pub fn page_storage_key(page_url: &str) -> String {
    format!("{}{}", PAGE_KEY_PREFIX, page_url)
}

/// Whether `key` has the per-page storage key shape
pub fn is_page_key(key: &str) -> bool {
    key.strip_prefix(PAGE_KEY_PREFIX)
        .is_some_and(|rest| !rest.is_empty())
}

/// Whether `value` is a valid notes collection: a sequence whose every
/// element is an object exposing at least one of `content` or `title`.
/// An empty sequence is valid.
pub fn is_valid_collection(value: &Value) -> bool {
    match value.as_array() {
        Some(items) => items.iter().all(|item| {
            item.as_object()
                .is_some_and(|obj| obj.contains_key("content") || obj.contains_key("title"))
        }),
        None => false,
    }
}

/// Decode a stored collection value, dropping it wholesale (with a warning)
/// if it fails the validity rule or cannot be deserialized.
pub fn decode_collection<T: DeserializeOwned>(key: &str, value: Value) -> Option<Vec<T>> {
    if !is_valid_collection(&value) {
        tracing::warn!("Dropping invalid collection under key '{}'", key);
        return None;
    }
    match serde_json::from_value(value) {
        Ok(items) => Some(items),
        Err(e) => {
            tracing::warn!("Failed to decode collection under key '{}': {}", key, e);
            None
        }
    }
}
