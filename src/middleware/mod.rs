//! Middleware Module
//!
//! Request-processing middleware for the backend.

/// Authentication middleware and extractor
pub mod auth;

pub use auth::{auth_middleware, AuthUser, AuthenticatedUser};
