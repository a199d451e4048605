//! JSON model artifacts, tagged by model family.

use std::path::Path;

use sentinel_core::errors::{ArtifactError, ClassifierError};
use serde::{Deserialize, Serialize};

use super::models::{ForestModel, LogisticModel, MlpModel};
use super::stacking::StackingModel;
use super::traits::Classifier;
use crate::features::AlignedVector;

/// A persisted model: `{"kind": "logistic" | "forest" | "mlp" | "stacking", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Logistic(LogisticModel),
    Forest(ForestModel),
    Mlp(MlpModel),
    Stacking(StackingModel),
}

impl ModelArtifact {
    /// Read, parse, and validate an artifact file.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        if !path.exists() {
            return Err(ArtifactError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|message| ArtifactError::Malformed {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parse and validate an artifact from JSON text.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let artifact: Self = serde_json::from_str(json).map_err(|e| e.to_string())?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Structural checks that would otherwise surface as per-call failures.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            ModelArtifact::Logistic(m) => {
                if m.weights.iter().chain([&m.intercept]).any(|w| !w.is_finite()) {
                    return Err("logistic model has non-finite coefficients".to_string());
                }
                Ok(())
            }
            ModelArtifact::Forest(m) => {
                if m.trees.is_empty() {
                    return Err("forest has no trees".to_string());
                }
                for (i, tree) in m.trees.iter().enumerate() {
                    tree.validate(m.n_features)
                        .map_err(|e| format!("tree {i}: {e}"))?;
                }
                Ok(())
            }
            ModelArtifact::Mlp(m) => m.validate(),
            ModelArtifact::Stacking(m) => m.validate(),
        }
    }

    fn inner(&self) -> &dyn Classifier {
        match self {
            ModelArtifact::Logistic(m) => m,
            ModelArtifact::Forest(m) => m,
            ModelArtifact::Mlp(m) => m,
            ModelArtifact::Stacking(m) => m,
        }
    }
}

impl Classifier for ModelArtifact {
    fn predict_proba(&self, input: &AlignedVector) -> Result<[f64; 2], ClassifierError> {
        self.inner().predict_proba(input)
    }

    fn expected_inputs(&self) -> usize {
        self.inner().expected_inputs()
    }

    fn kind(&self) -> &'static str {
        self.inner().kind()
    }
}
