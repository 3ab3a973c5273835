//! Page view-models consumed by the shell.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each page fetches through the gateway, keeps the fetched arrays, and does
//! its searching and filtering locally over them. Failures become a message
//! plus a retry affordance; nothing here retries automatically.

pub mod dashboard;
pub mod policies;
pub mod products;
pub mod users;


use crate::net::ApiError;

/// Load status of a page's primary data.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Ready(T),
    Failed { message: String, retryable: bool },
}

impl<T> LoadState<T> {
    /// Map a fetch result, showing `message` on failure.
    ///
    /// A 401 is not retryable from the page: the session is already gone.
    #[must_use]
    pub fn from_result(result: Result<T, ApiError>, message: &str) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(error) => {
                tracing::warn!(error = %error, "page load failed");
                Self::Failed { message: message.to_owned(), retryable: !error.is_unauthorized() }
            }
        }
    }

    #[must_use]
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// Case-insensitive substring match over optional fields.
pub(crate) fn matches_search(term: &str, fields: &[Option<&str>]) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields
        .iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Group an integer with thousands separators: `1250000` -> `1,250,000`.
#[must_use]
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Kenyan shilling amount rounded to whole units: `KES 185,000`.
#[must_use]
pub fn format_kes(amount: f64) -> String {
    let rounded = amount.abs().round();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let whole = rounded as u64;
    let sign = if amount < 0.0 && whole > 0 { "-" } else { "" };
    format!("{sign}KES {}", format_thousands(whole))
}
