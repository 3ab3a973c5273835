//! Development-only mock-data fallback.
//!
//! The decorator wraps read results only. It substitutes fixture data when
//! the remote system is unreachable (network failure or timeout) and the
//! fallback has been switched on for a non-production environment. Answers
//! from the server, errors included, always pass through untouched.

#[cfg(test)]
#[path = "fallback_test.rs"]
mod fallback_test;

use super::error::ApiError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FallbackMode {
    #[default]
    Disabled,
    Development,
}

impl FallbackMode {
    #[must_use]
    pub fn is_enabled(self) -> bool {
        self == Self::Development
    }

    /// Pass `result` through, or replace an unavailable-server error with `mock()`.
    ///
    /// # Errors
    ///
    /// Returns the original error unless the fallback applies.
    pub fn apply<T>(
        self,
        resource: &'static str,
        result: Result<T, ApiError>,
        mock: impl FnOnce() -> T,
    ) -> Result<T, ApiError> {
        match result {
            Err(error) if self.is_enabled() && error.is_unavailable() => {
                tracing::warn!(resource, error = %error, "API unavailable; serving mock data");
                Ok(mock())
            }
            other => other,
        }
    }
}
