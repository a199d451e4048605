//! Language identification: extension table first, weighted content signatures second.

pub mod detect;
pub mod types;

pub use detect::{detect_language, Detection};
pub use types::Language;
