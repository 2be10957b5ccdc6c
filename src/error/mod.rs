//! API Error Module
//!
//! Defines the error taxonomy used by every HTTP handler and the
//! conversion into JSON error responses.
//!
//! # Error Categories
//!
//! - Validation errors (rejected before any persistence or network call)
//! - Authorization errors (enforced server-side, never UI-only)
//! - Conflict errors (duplicate friend request, duplicate bookmark)
//! - Upstream AI errors (rate limit, quota, generic gateway failure)
//! - Database and unexpected internal errors

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::ApiError;
