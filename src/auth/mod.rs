//! Authentication Module
//!
//! Users, password hashing, JWT session tokens, and the signup/login
//! handlers. Every other module receives the authenticated caller as an
//! explicit `AuthenticatedUser` value; nothing reads ambient session
//! state.

/// User model and database operations
pub mod users;

/// JWT session tokens
pub mod sessions;

/// HTTP handlers for signup, login, and current-user lookup
pub mod handlers;

// Re-export commonly used items
pub use handlers::{get_me, login, signup};
pub use users::User;
