//! sentinel-core: shared foundations for the Sentinel code-risk engine.
//!
//! Errors, layered configuration, tracing setup, and the compiled defaults
//! every other crate reads. Nothing in here parses code.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;

pub use config::SentinelConfig;
pub use errors::{PipelineError, SentinelErrorCode};
