/// Serializable error envelope written to stderr.
///
/// Mirrors the API's own `{"success": false, ...}` convention so scripts can
/// treat local and server failures alike.
use serde::{Deserialize, Serialize};

use crate::api::ApiError;

/// A structured error envelope for JSON error output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorOutput {
    /// Always `false`.
    pub success: bool,
    /// Error details.
    pub error: ErrorDetail,
}

/// Error detail in the JSON error envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (snake_case).
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Server-provided hint, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorOutput {
    /// Construct from an `ApiError`.
    #[must_use]
    pub fn from_api_error(err: &ApiError) -> Self {
        Self::new(err.code(), err.to_string(), err.hint().map(str::to_owned))
    }

    /// Construct from a startup failure (configuration, HTTP stack).
    #[must_use]
    pub fn from_startup_error(err: &anyhow::Error) -> Self {
        Self::new("startup_error", format!("{err:#}"), None)
    }

    fn new(code: &str, message: String, hint: Option<String>) -> Self {
        Self {
            success: false,
            error: ErrorDetail {
                code: code.to_owned(),
                message,
                hint,
            },
        }
    }
}
