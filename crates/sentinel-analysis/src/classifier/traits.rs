//! Classifier trait: the inference contract every model implements.

use sentinel_core::errors::ClassifierError;

use crate::features::AlignedVector;

/// A trained binary classifier over aligned feature vectors.
pub trait Classifier: Send + Sync {
    /// `[p_benign, p_malicious]` for one sample.
    fn predict_proba(&self, input: &AlignedVector) -> Result<[f64; 2], ClassifierError>;

    /// Input width this model was trained on.
    fn expected_inputs(&self) -> usize;

    /// Short model-family name for logs (`logistic`, `forest`, ...).
    fn kind(&self) -> &'static str;
}

/// Reject inputs whose width does not match the model.
pub(crate) fn check_width(expected: usize, input: &AlignedVector) -> Result<(), ClassifierError> {
    if input.len() != expected {
        return Err(ClassifierError::ShapeMismatch {
            expected,
            actual: input.len(),
        });
    }
    Ok(())
}

/// Turn a malicious-class probability into the two-class output.
pub(crate) fn two_class(p_malicious: f64) -> Result<[f64; 2], ClassifierError> {
    if !p_malicious.is_finite() {
        return Err(ClassifierError::NonFinite);
    }
    let p = p_malicious.clamp(0.0, 1.0);
    Ok([1.0 - p, p])
}

pub(crate) fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}
