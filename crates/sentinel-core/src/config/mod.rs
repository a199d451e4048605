//! Configuration system for Sentinel.
//! TOML-based, layered resolution: CLI > env > project > user > defaults.

pub mod admission_config;
pub mod corpus_config;
pub mod fusion_config;
pub mod model_config;
pub mod sentinel_config;

pub use admission_config::AdmissionConfig;
pub use corpus_config::CorpusConfig;
pub use fusion_config::FusionConfig;
pub use model_config::ModelConfig;
pub use sentinel_config::{CliOverrides, SentinelConfig};
