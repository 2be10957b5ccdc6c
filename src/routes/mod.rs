//! Route configuration.

/// Top-level router assembly
pub mod router;

/// API route tables
pub mod api_routes;
