//! Authentication Handlers
//!
//! HTTP handlers for the `/api/auth/*` endpoints.

/// Request/response types shared by the auth handlers
pub mod types;

/// POST /api/auth/signup
pub mod signup;

/// POST /api/auth/login
pub mod login;

/// GET /api/auth/me
pub mod me;

pub use login::login;
pub use me::get_me;
pub use signup::signup;
