//! Sentiment Core
//!
//! Core types shared across the sentiment service crates.
//!
//! This crate provides:
//! - The binary `Sentiment` label and its dataset/response spellings
//! - Classification results and confidence percentages
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{ClassificationResult, Confidence, Sentiment};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{ClassificationResult, Confidence, Sentiment};
}
