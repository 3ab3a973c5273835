use super::*;

// =============================================================================
// from_status
// =============================================================================

#[test]
fn unauthorized_status_maps_to_unauthorized() {
    let error = ApiError::from_status(401, r#"{"error":"Invalid credentials"}"#);
    assert_eq!(error, ApiError::Unauthorized { message: "Invalid credentials".to_owned() });
    assert!(error.is_unauthorized());
}

#[test]
fn not_found_uses_server_message() {
    let error = ApiError::from_status(404, r#"{"error":"Policy not found"}"#);
    assert_eq!(error, ApiError::NotFound { message: "Policy not found".to_owned() });
    assert!(error.is_not_found());
}

#[test]
fn not_found_without_body_uses_default_message() {
    assert_eq!(
        ApiError::from_status(404, ""),
        ApiError::NotFound { message: "Resource not found".to_owned() }
    );
}

#[test]
fn conflict_is_rejected_with_status() {
    assert_eq!(
        ApiError::from_status(409, r#"{"error":"Phone number already registered"}"#),
        ApiError::Rejected { status: 409, message: "Phone number already registered".to_owned() }
    );
}

#[test]
fn message_field_is_used_when_error_is_absent() {
    assert_eq!(
        ApiError::from_status(422, r#"{"message":"premium_amount must be positive"}"#),
        ApiError::Rejected { status: 422, message: "premium_amount must be positive".to_owned() }
    );
}

#[test]
fn blank_error_text_falls_back_to_default() {
    assert_eq!(
        ApiError::from_status(400, r#"{"error":"   "}"#),
        ApiError::Rejected { status: 400, message: "Invalid request".to_owned() }
    );
}

#[test]
fn server_errors_are_classified_as_server() {
    assert_eq!(
        ApiError::from_status(503, "<html>bad gateway</html>"),
        ApiError::Server { status: 503, message: "Internal server error".to_owned() }
    );
}

// =============================================================================
// predicates and messages
// =============================================================================

#[test]
fn only_network_and_timeout_are_unavailable() {
    assert!(ApiError::Network("refused".to_owned()).is_unavailable());
    assert!(ApiError::Timeout.is_unavailable());
    assert!(!ApiError::Unauthorized { message: String::new() }.is_unavailable());
    assert!(!ApiError::Server { status: 500, message: String::new() }.is_unavailable());
}

#[test]
fn user_message_surfaces_validation_text() {
    let error = ApiError::Rejected { status: 422, message: "Name is required".to_owned() };
    assert_eq!(error.user_message(), "Name is required");
}

#[test]
fn user_message_is_generic_for_server_errors() {
    let error = ApiError::Server { status: 500, message: "stack trace".to_owned() };
    assert_eq!(error.user_message(), "Something went wrong. Please try again.");
}
