//! Error types for scene setup
//!
//! Per-frame updates are total and never fail; everything here surfaces
//! before the tick loop starts.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    /// Rejection sampling gave up without finding a free spot
    #[error("no valid position for {what} after {attempts} attempts")]
    PlacementExhausted { what: &'static str, attempts: u32 },

    /// A config value violates its invariant (negative radius, empty pool, ...)
    #[error("invalid config `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl SceneError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SceneError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}
