//! Friend requests and friendships.
//!
//! A friendship starts as a pending request from one user to another.
//! Only the receiver may respond; accepting flips the request to
//! `accepted` and writes both directions of the friendship in the same
//! transaction, so the relation is always symmetric.

/// Database operations for requests and friendships
pub mod db;

/// HTTP handlers
pub mod handlers;
