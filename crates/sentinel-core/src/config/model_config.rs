//! Classifier artifact configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Locations of the offline-produced classifier artifacts.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ModelConfig {
    /// JSON model artifact. When absent every prediction falls back.
    pub model_path: Option<PathBuf>,
    /// JSON feature schema the model was trained against.
    pub schema_path: Option<PathBuf>,
    /// Optional MLP artifact whose output is appended as the stacking column.
    pub augmenter_path: Option<PathBuf>,
    /// Re-check the model file's mtime on every analysis. Default: true.
    pub hot_reload: Option<bool>,
}

impl ModelConfig {
    pub fn effective_hot_reload(&self) -> bool {
        self.hot_reload.unwrap_or(true)
    }
}
