//! Classifier inference: the `Classifier` contract, artifact-backed models,
//! and the hot-swappable handle the pipeline reads from.

pub mod artifact;
pub mod handle;
pub mod models;
pub mod stacking;
pub mod traits;

pub use artifact::ModelArtifact;
pub use handle::ModelHandle;
pub use models::{DecisionTree, DenseLayer, ForestModel, LogisticModel, MlpModel, TreeNode};
pub use stacking::StackingModel;
pub use traits::Classifier;
