//! Users page: paged listing with local search and role filtering.

#[cfg(test)]
#[path = "users_test.rs"]
mod users_test;

use crate::net::types::{CreateUserRequest, Page, Role, User, UserQuery};
use crate::net::{ApiClient, ApiError};

use super::{LoadState, matches_search};

pub const LOAD_FAILED: &str = "Failed to load users. Please check your connection and try again.";

/// Fetch one page of users.
pub async fn load(client: &ApiClient, query: &UserQuery) -> LoadState<Page<User>> {
    LoadState::from_result(client.users().list(query).await, LOAD_FAILED)
}

/// Users matching `term` (name, phone, email, national id) and `role`.
#[must_use]
pub fn filter<'a>(users: &'a [User], term: &str, role: Option<Role>) -> Vec<&'a User> {
    users
        .iter()
        .filter(|u| role.is_none_or(|r| u.role == r))
        .filter(|u| {
            matches_search(
                term,
                &[
                    Some(u.name.as_str()),
                    Some(u.phone_number.as_str()),
                    u.email.as_deref(),
                    Some(u.national_id.as_str()),
                ],
            )
        })
        .collect()
}

/// Flip a user's activation and return the server's view of them.
///
/// # Errors
///
/// Returns the gateway failure.
pub async fn toggle_status(client: &ApiClient, id: &str) -> Result<User, ApiError> {
    client.users().toggle_status(id).await
}

/// Check a registration form before proposing it.
///
/// # Errors
///
/// Returns the message to show beside the form.
pub fn validate_new_user(request: &CreateUserRequest) -> Result<(), &'static str> {
    if request.name.trim().is_empty() {
        return Err("Name is required.");
    }
    let phone = request.phone_number.trim();
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    if digits.len() < 9 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err("Enter a valid phone number.");
    }
    if request.national_id.trim().is_empty() {
        return Err("National ID is required.");
    }
    if request.password.len() < 6 {
        return Err("Password must be at least 6 characters.");
    }
    Ok(())
}
