//! Hot-swappable model holder.
//!
//! Wraps the active classifier in an `ArcSwapOption` so readers never block
//! and a reload swaps the pointer atomically. A call already holding the
//! previous model finishes on it.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use arc_swap::ArcSwapOption;
use sentinel_core::errors::{ArtifactError, ClassifierError};
use sentinel_core::tracing::metrics;

use super::artifact::ModelArtifact;
use super::traits::Classifier;
use crate::features::AlignedVector;

/// A fully loaded model plus the file timestamp it was read at.
struct LoadedModel {
    classifier: Box<dyn Classifier>,
    modified: Option<SystemTime>,
}

/// Shared, swappable classifier. Clones share the same slot.
#[derive(Clone)]
pub struct ModelHandle {
    inner: Arc<ArcSwapOption<LoadedModel>>,
    path: Option<PathBuf>,
}

impl Default for ModelHandle {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("path", &self.path)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

impl ModelHandle {
    /// A handle with no model; every prediction reports `NotLoaded`.
    pub fn empty() -> Self {
        Self {
            inner: Arc::new(ArcSwapOption::empty()),
            path: None,
        }
    }

    /// Hold an in-memory classifier. Never reloads.
    pub fn from_classifier(classifier: impl Classifier + 'static) -> Self {
        let handle = Self::empty();
        handle.store(classifier);
        handle
    }

    /// Load the artifact at `path`.
    ///
    /// A missing file yields an empty handle that keeps watching `path`; a
    /// present but malformed file is an error.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let handle = Self {
            inner: Arc::new(ArcSwapOption::empty()),
            path: Some(path.to_path_buf()),
        };
        match read_model(path) {
            Ok(model) => {
                tracing::info!(path = %path.display(), kind = model.classifier.kind(), "model loaded");
                handle.inner.store(Some(Arc::new(model)));
            }
            Err(ArtifactError::NotFound { .. }) => {
                tracing::warn!(path = %path.display(), "model artifact not found; predictions will fall back");
            }
            Err(e) => return Err(e),
        }
        Ok(handle)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.load().is_some()
    }

    /// Input width of the current model.
    pub fn expected_inputs(&self) -> Option<usize> {
        self.inner
            .load()
            .as_ref()
            .map(|m| m.classifier.expected_inputs())
    }

    /// Predict with whichever model is current at call time.
    pub fn predict_proba(&self, input: &AlignedVector) -> Result<[f64; 2], ClassifierError> {
        let guard = self.inner.load();
        let model = guard.as_ref().ok_or(ClassifierError::NotLoaded)?;
        model.classifier.predict_proba(input)
    }

    /// Swap in an in-memory classifier.
    pub fn store(&self, classifier: impl Classifier + 'static) {
        self.inner.store(Some(Arc::new(LoadedModel {
            classifier: Box::new(classifier),
            modified: None,
        })));
    }

    /// Reload from disk unconditionally. On failure the current model stays.
    pub fn reload(&self) -> Result<(), ArtifactError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let model = read_model(path)?;
        self.inner.store(Some(Arc::new(model)));
        tracing::info!(path = %path.display(), { metrics::MODEL_RELOADS } = 1u64, "model hot-reloaded");
        Ok(())
    }

    /// Reload when the artifact's mtime is newer than the loaded one.
    /// Returns `true` when a new model was swapped in.
    pub fn reload_if_modified(&self) -> bool {
        let Some(path) = &self.path else {
            return false;
        };
        let Some(on_disk) = modified_time(path) else {
            return false;
        };
        let newer = match self.inner.load().as_ref() {
            Some(current) => current.modified.map_or(true, |loaded| on_disk > loaded),
            None => true,
        };
        if !newer {
            return false;
        }
        match self.reload() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "model reload failed; keeping previous model");
                false
            }
        }
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

fn read_model(path: &Path) -> Result<LoadedModel, ArtifactError> {
    let modified = modified_time(path);
    let artifact = ModelArtifact::load(path)?;
    Ok(LoadedModel {
        classifier: Box::new(artifact),
        modified,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::LogisticModel;

    fn input(n: usize) -> AlignedVector {
        AlignedVector {
            values: vec![1.0; n],
            nodes_scanned: n,
            dropped: 0,
            extra: None,
        }
    }

    #[test]
    fn empty_handle_reports_not_loaded() {
        let handle = ModelHandle::empty();
        assert!(!handle.is_loaded());
        assert_eq!(handle.predict_proba(&input(1)), Err(ClassifierError::NotLoaded));
        assert!(!handle.reload_if_modified());
    }

    #[test]
    fn clones_share_the_slot() {
        let handle = ModelHandle::empty();
        let clone = handle.clone();
        handle.store(LogisticModel {
            weights: vec![0.0],
            intercept: 0.0,
        });
        assert!(clone.is_loaded());
        assert_eq!(clone.expected_inputs(), Some(1));
    }

    #[test]
    fn missing_artifact_gives_empty_handle() {
        let dir = tempfile::tempdir().unwrap();
        let handle = ModelHandle::load(&dir.path().join("model.json")).unwrap();
        assert!(!handle.is_loaded());
        assert!(handle.path().is_some());
    }

    #[test]
    fn malformed_artifact_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, r#"{"kind": "logistic"}"#).unwrap();
        assert!(ModelHandle::load(&path).is_err());
    }
}
