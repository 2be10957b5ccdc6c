//! Server-authoritative exam scoring.
//!
//! The client submits the question set and its answers; the score,
//! percentage, and point award are computed here and nowhere else.
//! A per-exam award ledger makes the point grant idempotent under
//! retries.

/// Pure scoring arithmetic
pub mod scoring;

/// Database operations
pub mod db;

/// HTTP handlers
pub mod handlers;
