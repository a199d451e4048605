//! Stacked ensemble: base-model probabilities feed a logistic meta-model.

use sentinel_core::errors::ClassifierError;
use serde::{Deserialize, Serialize};

use super::artifact::ModelArtifact;
use super::models::LogisticModel;
use super::traits::{check_width, two_class, Classifier};
use crate::features::AlignedVector;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackingModel {
    /// Width of the vector every base model sees, NN column included.
    pub n_features: usize,
    /// Whether the last input column is the neural-network probability.
    #[serde(default)]
    pub uses_nn_column: bool,
    pub base_models: Vec<ModelArtifact>,
    /// One weight per base model.
    pub meta: LogisticModel,
}

impl StackingModel {
    pub fn validate(&self) -> Result<(), String> {
        if self.base_models.is_empty() {
            return Err("stacking model has no base models".to_string());
        }
        if self.meta.weights.len() != self.base_models.len() {
            return Err(format!(
                "meta model has {} weights for {} base models",
                self.meta.weights.len(),
                self.base_models.len()
            ));
        }
        for (i, base) in self.base_models.iter().enumerate() {
            if base.expected_inputs() != self.n_features {
                return Err(format!(
                    "base model {i} expects {} inputs, stack declares {}",
                    base.expected_inputs(),
                    self.n_features
                ));
            }
            base.validate().map_err(|e| format!("base model {i}: {e}"))?;
        }
        Ok(())
    }
}

impl Classifier for StackingModel {
    fn predict_proba(&self, input: &AlignedVector) -> Result<[f64; 2], ClassifierError> {
        check_width(self.n_features, input)?;
        if self.uses_nn_column && input.extra.is_none() {
            // Same width but the last column is a schema feature, not the NN output.
            return Err(ClassifierError::ShapeMismatch {
                expected: self.n_features,
                actual: input.values.len(),
            });
        }
        let mut level_one = Vec::with_capacity(self.base_models.len());
        for base in &self.base_models {
            level_one.push(base.predict_proba(input)?[1]);
        }
        two_class(self.meta.p_malicious(level_one.into_iter()))
    }

    fn expected_inputs(&self) -> usize {
        self.n_features
    }

    fn kind(&self) -> &'static str {
        "stacking"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::traits::sigmoid;

    fn constant_logistic(n: usize, intercept: f64) -> ModelArtifact {
        ModelArtifact::Logistic(LogisticModel {
            weights: vec![0.0; n],
            intercept,
        })
    }

    fn stack(uses_nn_column: bool) -> StackingModel {
        StackingModel {
            n_features: 2,
            uses_nn_column,
            base_models: vec![constant_logistic(2, 0.0), constant_logistic(2, 0.0)],
            meta: LogisticModel {
                weights: vec![1.0, 1.0],
                intercept: -1.0,
            },
        }
    }

    #[test]
    fn meta_model_sees_base_probabilities() {
        let input = AlignedVector {
            values: vec![1.0],
            nodes_scanned: 1,
            dropped: 0,
            extra: Some(0.9),
        };
        let p = stack(true).predict_proba(&input).unwrap()[1];
        // Both bases say 0.5: meta logit = 0.5 + 0.5 - 1.0 = 0.
        assert!((p - sigmoid(0.0)).abs() < 1e-12);
    }

    #[test]
    fn nn_column_required_when_declared() {
        let input = AlignedVector {
            values: vec![1.0, 2.0],
            nodes_scanned: 2,
            dropped: 0,
            extra: None,
        };
        assert!(matches!(
            stack(true).predict_proba(&input),
            Err(ClassifierError::ShapeMismatch { .. })
        ));
        assert!(stack(false).predict_proba(&input).is_ok());
    }

    #[test]
    fn validation_checks_meta_width() {
        let mut model = stack(false);
        model.meta.weights.push(1.0);
        assert!(model.validate().is_err());
    }
}
