//! Shared types for the site service
//!
//! Error types, resource models, and small utilities used by the HTTP
//! service. The membership signature crate stands alone.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use error::{AppError, AppResult, ErrorCode};
pub use http;
pub use serde::{Deserialize, Serialize};
