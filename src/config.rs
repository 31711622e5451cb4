//! StickVault configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main StickVault configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StickVaultConfig {
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Page layout configuration
    #[serde(default)]
    pub layout: LayoutConfig,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the persisted namespace
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Page layout configuration
///
/// Bounds the pseudo-random placement of newly created notes so a note at
/// default size stays fully inside the viewport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Viewport width in pixels
    pub viewport_width: f64,

    /// Viewport height in pixels
    pub viewport_height: f64,

    /// Default note width in pixels
    pub note_width: f64,

    /// Default note height in pixels
    pub note_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 800.0,
            note_width: 350.0,
            note_height: 250.0,
        }
    }
}

/// Default data directory (~/.stickvault/)
pub fn default_data_dir() -> PathBuf {
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".stickvault")
}
