//! Gateway error taxonomy.
//!
//! Every resource function returns `Result<T, ApiError>`. Status codes are
//! classified once here so pages can branch on the variant instead of
//! inspecting raw HTTP details.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The server could not be reached (DNS, refused connection, reset).
    #[error("network request failed: {0}")]
    Network(String),

    /// The request exceeded the client's fixed timeout.
    #[error("request timed out")]
    Timeout,

    /// 401: the session has been torn down by the gateway.
    #[error("authorization denied: {message}")]
    Unauthorized { message: String },

    /// 404 on the addressed resource.
    #[error("not found: {message}")]
    NotFound { message: String },

    /// Any other 4xx, typically validation or conflict.
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// 5xx or any status outside the classes above.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// A success body could not be decoded into the expected type.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// A success envelope carried no `data` payload.
    #[error("response envelope missing data")]
    MissingData,

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

/// Error body shape: `{ "error": "..." }`, occasionally `{ "message": "..." }`.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ApiError {
    /// Classify a non-success status and its raw body.
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = error_message(body).unwrap_or_else(|| default_message(status).to_owned());
        match status {
            401 => Self::Unauthorized { message },
            404 => Self::NotFound { message },
            400..=499 => Self::Rejected { status, message },
            _ => Self::Server { status, message },
        }
    }

    pub(crate) fn from_transport(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_builder() {
            Self::ClientBuild(error.to_string())
        } else {
            Self::Network(error.to_string())
        }
    }

    /// True when the remote system is unreachable rather than answering.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout)
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Text suitable for showing to an operator.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) | Self::Timeout => {
                "Unable to reach the server. Please check your connection and try again.".to_owned()
            }
            Self::Unauthorized { .. } => "Your session has expired. Please log in again.".to_owned(),
            Self::NotFound { message } | Self::Rejected { message, .. } => message.clone(),
            Self::Server { .. } | Self::Decode(_) | Self::MissingData | Self::ClientBuild(_) => {
                "Something went wrong. Please try again.".to_owned()
            }
        }
    }
}

fn error_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .error
        .or(parsed.message)
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

fn default_message(status: u16) -> &'static str {
    match status {
        400 => "Invalid request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Resource not found",
        409 => "Conflict",
        422 => "Validation failed",
        400..=499 => "Request rejected",
        _ => "Internal server error",
    }
}
