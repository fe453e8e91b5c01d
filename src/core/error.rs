//! Error types.

use thiserror::Error;

/// Errors raised while loading component settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Settings JSON could not be parsed.
    #[error("invalid settings json: {0}")]
    Json(#[from] serde_json::Error),

    /// A gain or limit was negative or not finite.
    #[error("invalid value for `{field}`: {value}")]
    InvalidValue { field: &'static str, value: f32 },
}
