//! Networking: the HTTP gateway and its typed resource functions.
//!
//! SYSTEM CONTEXT
//! ==============
//! `client` owns the single configured HTTP client and its interceptors,
//! `types` defines the wire schema, and each resource module wraps one
//! endpoint family on top of the client.

pub mod auth;
pub mod client;
pub mod dashboard;
pub mod error;
pub mod fallback;
pub mod mock;
pub mod policies;
pub mod products;
pub mod types;
pub mod users;

pub use auth::AuthBackend;
pub use client::{ApiClient, TokenSource, UnauthorizedHandler};
pub use error::ApiError;
pub use fallback::FallbackMode;
