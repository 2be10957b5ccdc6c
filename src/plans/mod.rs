//! Study plan CRUD.
//!
//! Plans are private to their owner: every operation is scoped by the
//! authenticated user id, so one user's plan ids are invisible to
//! another.

/// Database operations
pub mod db;

/// HTTP handlers
pub mod handlers;
