/// Validated response bodies.
use serde_json::Value;

use super::errors::ApiError;

/// A response that passed envelope and shape checks, kept in both forms:
/// `raw` for passthrough output, `data` for rendering.
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub raw: Value,
    pub data: T,
}

impl<T> Fetched<T> {
    /// Narrow the typed side, keeping `raw` untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        Fetched {
            raw: self.raw,
            data: f(self.data),
        }
    }

    /// Like [`Fetched::map`] for narrowing steps that can reject the body.
    ///
    /// # Errors
    ///
    /// Whatever `f` returns.
    pub fn try_map<U>(self, f: impl FnOnce(T) -> Result<U, ApiError>) -> Result<Fetched<U>, ApiError> {
        Ok(Fetched {
            raw: self.raw,
            data: f(self.data)?,
        })
    }
}
