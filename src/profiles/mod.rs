//! Profiles, points, page views, and admin statistics.
//!
//! Points and the completed-exam counter are server-owned: they only
//! move through the exam submission path, never through profile edits.

/// Database operations
pub mod db;

/// HTTP handlers
pub mod handlers;
