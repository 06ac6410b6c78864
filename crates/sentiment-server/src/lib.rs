//! Sentiment Server
//!
//! HTTP front end for the review sentiment pipeline. The pipeline is fitted
//! once at startup, stored in [`AppState`], and shared read-only by every
//! request.

pub mod config;
pub mod routes;
pub mod state;

pub use config::{Overrides, ServerConfig};
pub use routes::{create_router, ClassifyRequest, ClassifyResponse};
pub use state::{AppState, ModelInfo};
