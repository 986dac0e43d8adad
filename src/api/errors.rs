/// Errors from the Moltbook API layer.
use thiserror::Error;

/// Everything that can go wrong between building a request and holding a
/// validated payload.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A caller-supplied parameter is outside the endpoint's accepted set.
    /// Raised before any network call.
    #[error("Invalid {param}: {reason}")]
    Validation {
        /// Parameter name as it appears on the wire (e.g. `limit`).
        param: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// Every attempt timed out.
    #[error("Request timed out after {attempts} attempts")]
    NetworkTimeout {
        /// Number of attempts made before giving up.
        attempts: u32,
    },

    /// The server kept answering 429 after the honoring wait.
    #[error("Rate limited by Moltbook{}", retry_after.map(|s| format!(" (retry after {s}s)")).unwrap_or_default())]
    RateLimited {
        /// Seconds the server asked us to wait on the final response, if given.
        retry_after: Option<u64>,
    },

    /// Could not reach the host at all (DNS, refused connection, TLS).
    #[error("Could not connect to Moltbook: {0}")]
    Connection(String),

    /// The server reported that the requested resource does not exist.
    #[error("{resource} not found")]
    NotFound {
        /// Human name of the missing thing, e.g. "Post".
        resource: String,
    },

    /// Body was not JSON, or not the shape the endpoint promises.
    #[error("Invalid response from Moltbook: {0}")]
    InvalidResponse(String),

    /// Non-success HTTP status with no more specific meaning.
    #[error("HTTP {status}")]
    Http {
        /// The status code of the last response.
        status: u16,
    },

    /// The envelope said `success: false`.
    #[error("{message}")]
    Api {
        /// The server's `error` string.
        message: String,
        /// The server's `hint` string, if any.
        hint: Option<String>,
    },
}

impl ApiError {
    /// Shorthand for a validation failure.
    pub(crate) fn validation(param: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            param,
            reason: reason.into(),
        }
    }

    /// Return the CLI exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } => 2,
            Self::NetworkTimeout { .. } | Self::RateLimited { .. } | Self::Connection(_) => 3,
            Self::NotFound { .. } => 4,
            Self::InvalidResponse(_) | Self::Http { .. } | Self::Api { .. } => 1,
        }
    }

    /// Machine-readable error code (snake_case) for the JSON error envelope.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::NetworkTimeout { .. } => "network_timeout",
            Self::RateLimited { .. } => "rate_limited",
            Self::Connection(_) => "connection_failed",
            Self::NotFound { .. } => "not_found",
            Self::InvalidResponse(_) => "invalid_response",
            Self::Http { .. } => "http_error",
            Self::Api { .. } => "api_error",
        }
    }

    /// Server-provided hint, when the envelope carried one.
    #[must_use]
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Api { hint, .. } => hint.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = ApiError::NotFound {
            resource: "Post".to_owned(),
        };
        assert_eq!(err.to_string(), "Post not found");
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_rate_limited_message() {
        let with = ApiError::RateLimited {
            retry_after: Some(2),
        };
        let without = ApiError::RateLimited { retry_after: None };
        assert_eq!(with.to_string(), "Rate limited by Moltbook (retry after 2s)");
        assert_eq!(without.to_string(), "Rate limited by Moltbook");
    }

    #[test]
    fn test_transient_errors_share_exit_code() {
        assert_eq!(ApiError::NetworkTimeout { attempts: 3 }.exit_code(), 3);
        assert_eq!(ApiError::Connection("refused".to_owned()).exit_code(), 3);
        assert_eq!(ApiError::validation("limit", "too big").exit_code(), 2);
    }
}
