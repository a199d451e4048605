//! Artifact-backed base models: logistic regression, tree ensemble, MLP.

use sentinel_core::errors::ClassifierError;
use serde::{Deserialize, Serialize};

use super::traits::{check_width, sigmoid, two_class, Classifier};
use crate::features::AlignedVector;

/// `sigmoid(w · x + b)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub weights: Vec<f64>,
    pub intercept: f64,
}

impl LogisticModel {
    pub(crate) fn p_malicious(&self, inputs: impl Iterator<Item = f64>) -> f64 {
        let z: f64 = self
            .weights
            .iter()
            .zip(inputs)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept;
        sigmoid(z)
    }
}

impl Classifier for LogisticModel {
    fn predict_proba(&self, input: &AlignedVector) -> Result<[f64; 2], ClassifierError> {
        check_width(self.weights.len(), input)?;
        two_class(self.p_malicious(input.inputs()))
    }

    fn expected_inputs(&self) -> usize {
        self.weights.len()
    }

    fn kind(&self) -> &'static str {
        "logistic"
    }
}

/// One node of a flattened decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum TreeNode {
    /// `x[feature] <= threshold` goes left, otherwise right.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf { p_malicious: f64 },
}

/// A decision tree stored as a node array rooted at index 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Structural check: children point forward and features are in range.
    /// Forward-only links make every walk terminate.
    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("empty tree".to_string());
        }
        for (index, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                left,
                right,
                ..
            } = *node
            {
                if feature >= n_features {
                    return Err(format!(
                        "node {index} splits on feature {feature} of {n_features}"
                    ));
                }
                for child in [left, right] {
                    if child <= index || child >= self.nodes.len() {
                        return Err(format!("node {index} has invalid child {child}"));
                    }
                }
            }
        }
        Ok(())
    }

    fn p_malicious(&self, input: &AlignedVector) -> Result<f64, ClassifierError> {
        let mut index = 0;
        loop {
            match self.nodes.get(index) {
                Some(TreeNode::Leaf { p_malicious }) => return Ok(*p_malicious),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let x = input.get(*feature).ok_or(ClassifierError::ShapeMismatch {
                        expected: feature + 1,
                        actual: input.len(),
                    })?;
                    let next = if x <= *threshold { *left } else { *right };
                    if next <= index {
                        return Err(ClassifierError::Malformed(format!(
                            "backward link {index} -> {next}"
                        )));
                    }
                    index = next;
                }
                None => {
                    return Err(ClassifierError::Malformed(format!(
                        "node index {index} out of range"
                    )))
                }
            }
        }
    }
}

/// Soft-voting tree ensemble: mean of the trees' leaf probabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestModel {
    pub n_features: usize,
    pub trees: Vec<DecisionTree>,
}

impl Classifier for ForestModel {
    fn predict_proba(&self, input: &AlignedVector) -> Result<[f64; 2], ClassifierError> {
        check_width(self.n_features, input)?;
        if self.trees.is_empty() {
            return Err(ClassifierError::Malformed("forest has no trees".to_string()));
        }
        let mut total = 0.0;
        for tree in &self.trees {
            total += tree.p_malicious(input)?;
        }
        two_class(total / self.trees.len() as f64)
    }

    fn expected_inputs(&self) -> usize {
        self.n_features
    }

    fn kind(&self) -> &'static str {
        "forest"
    }
}

/// Fully connected layer; `weights[out][in]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f64>>,
    pub biases: Vec<f64>,
}

impl DenseLayer {
    fn forward(&self, input: &[f64]) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.biases)
            .map(|(row, b)| row.iter().zip(input).map(|(w, x)| w * x).sum::<f64>() + b)
            .collect()
    }
}

/// Standard-scaled dense network: ReLU hidden layers, one sigmoid output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlpModel {
    pub scaler_mean: Vec<f64>,
    pub scaler_scale: Vec<f64>,
    pub layers: Vec<DenseLayer>,
}

impl MlpModel {
    /// Layer shapes must chain from the scaler width down to one output.
    pub fn validate(&self) -> Result<(), String> {
        let width = self.scaler_mean.len();
        if self.scaler_scale.len() != width {
            return Err(format!(
                "scaler mean has {width} entries, scale has {}",
                self.scaler_scale.len()
            ));
        }
        if self.layers.is_empty() {
            return Err("network has no layers".to_string());
        }
        let mut inputs = width;
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.weights.len() != layer.biases.len() {
                return Err(format!("layer {i}: weight rows and biases differ"));
            }
            if let Some(row) = layer.weights.iter().find(|r| r.len() != inputs) {
                return Err(format!(
                    "layer {i}: row width {} but {inputs} inputs",
                    row.len()
                ));
            }
            inputs = layer.biases.len();
        }
        if inputs != 1 {
            return Err(format!("output layer has {inputs} units, expected 1"));
        }
        Ok(())
    }

    pub(crate) fn p_malicious(&self, input: &AlignedVector) -> Result<f64, ClassifierError> {
        check_width(self.scaler_mean.len(), input)?;
        let mut activations: Vec<f64> = input
            .inputs()
            .zip(self.scaler_mean.iter().zip(&self.scaler_scale))
            .map(|(x, (mean, scale))| {
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                (x - mean) / scale
            })
            .collect();

        let last = self.layers.len().saturating_sub(1);
        for (i, layer) in self.layers.iter().enumerate() {
            activations = layer.forward(&activations);
            if i < last {
                for a in &mut activations {
                    *a = a.max(0.0);
                }
            }
        }
        let logit = activations
            .first()
            .copied()
            .ok_or_else(|| ClassifierError::Malformed("empty output layer".to_string()))?;
        Ok(sigmoid(logit))
    }
}

impl Classifier for MlpModel {
    fn predict_proba(&self, input: &AlignedVector) -> Result<[f64; 2], ClassifierError> {
        two_class(self.p_malicious(input)?)
    }

    fn expected_inputs(&self) -> usize {
        self.scaler_mean.len()
    }

    fn kind(&self) -> &'static str {
        "mlp"
    }
}
