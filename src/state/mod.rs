//! Client-side state: durable storage and the session lifecycle.

pub mod session;
pub mod storage;
