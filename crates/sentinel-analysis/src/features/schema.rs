//! Persisted feature schema and vector alignment.

use std::path::Path;

use rustc_hash::FxHashSet;
use sentinel_core::constants::FEATURE_SCHEMA_VERSION;
use sentinel_core::errors::ArtifactError;
use serde::{Deserialize, Serialize};

use super::vector::FeatureVector;

/// Ordered column list a classifier was trained against.
///
/// Stored as `{"version": 1, "columns": [...]}` next to the model artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub version: u32,
    pub columns: Vec<String>,
}

impl FeatureSchema {
    /// Build a schema, rejecting duplicate column names.
    pub fn new(columns: Vec<String>) -> Result<Self, ArtifactError> {
        let schema = Self {
            version: FEATURE_SCHEMA_VERSION,
            columns,
        };
        schema.validate()?;
        Ok(schema)
    }

    /// Load and validate a JSON schema artifact.
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
        let schema: Self =
            serde_json::from_str(&content).map_err(|e| ArtifactError::Malformed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        schema.validate()?;
        tracing::info!(path = %path.display(), columns = schema.columns.len(), "feature schema loaded");
        Ok(schema)
    }

    fn validate(&self) -> Result<(), ArtifactError> {
        if self.version != FEATURE_SCHEMA_VERSION {
            return Err(ArtifactError::UnsupportedVersion {
                found: self.version,
                expected: FEATURE_SCHEMA_VERSION,
            });
        }
        let mut seen = FxHashSet::default();
        for column in &self.columns {
            if !seen.insert(column.as_str()) {
                return Err(ArtifactError::DuplicateColumn {
                    column: column.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// A feature vector reindexed to a schema, ready for inference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedVector {
    /// Exactly one value per schema column, in schema order.
    pub values: Vec<f64>,
    /// Distinct features present before alignment.
    pub nodes_scanned: usize,
    /// Features dropped because the schema has no column for them.
    pub dropped: usize,
    /// Optional probability column appended after the schema columns.
    pub extra: Option<f64>,
}

impl AlignedVector {
    /// Model input width: schema columns plus the extra column, if any.
    pub fn len(&self) -> usize {
        self.values.len() + usize::from(self.extra.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Input `index`, counting the extra column last.
    pub fn get(&self, index: usize) -> Option<f64> {
        match self.values.get(index) {
            Some(v) => Some(*v),
            None if index == self.values.len() => self.extra,
            None => None,
        }
    }

    /// All model inputs in order.
    pub fn inputs(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied().chain(self.extra)
    }

    /// Returns a copy carrying `p` as the appended column.
    pub fn with_extra(&self, p: f64) -> Self {
        Self {
            extra: Some(p),
            ..self.clone()
        }
    }
}

/// Reindex `vector` against `schema`: missing columns become 0, unknown
/// features are dropped and counted.
pub fn align(vector: &FeatureVector, schema: &FeatureSchema) -> AlignedVector {
    let values: Vec<f64> = schema
        .columns
        .iter()
        .map(|c| vector.get(c) as f64)
        .collect();
    let matched = schema.columns.iter().filter(|c| vector.contains(c)).count();
    AlignedVector {
        values,
        nodes_scanned: vector.len(),
        dropped: vector.len() - matched,
        extra: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(cols: &[&str]) -> FeatureSchema {
        FeatureSchema::new(cols.iter().map(|c| c.to_string()).collect()).unwrap()
    }

    #[test]
    fn align_fills_missing_and_drops_unknown() {
        let mut v = FeatureVector::new();
        v.set("python_call", 3);
        v.set("python_string", 2);
        v.set("is_python", 1);

        let aligned = align(&v, &schema(&["is_python", "python_call", "common_loop_statement"]));
        assert_eq!(aligned.values, vec![1.0, 3.0, 0.0]);
        assert_eq!(aligned.nodes_scanned, 3);
        assert_eq!(aligned.dropped, 1);
        assert_eq!(aligned.len(), 3);
    }

    #[test]
    fn extra_column_is_appended_last() {
        let aligned = align(&FeatureVector::new(), &schema(&["a", "b"])).with_extra(0.7);
        assert_eq!(aligned.len(), 3);
        assert_eq!(aligned.get(2), Some(0.7));
        assert_eq!(aligned.get(3), None);
        assert_eq!(aligned.inputs().collect::<Vec<_>>(), vec![0.0, 0.0, 0.7]);
    }

    #[test]
    fn duplicate_columns_rejected() {
        let err = FeatureSchema::new(vec!["a".into(), "a".into()]).unwrap_err();
        assert!(matches!(err, ArtifactError::DuplicateColumn { column } if column == "a"));
    }

    #[test]
    fn load_rejects_wrong_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        std::fs::write(&path, r#"{"version": 99, "columns": ["a"]}"#).unwrap();
        assert!(matches!(
            FeatureSchema::load(&path),
            Err(ArtifactError::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            FeatureSchema::load(&dir.path().join("nope.json")),
            Err(ArtifactError::NotFound { .. })
        ));
    }
}
