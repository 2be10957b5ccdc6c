//! AI gateway proxy.
//!
//! Every AI feature goes through the server: the gateway key never
//! reaches a client, inputs are length-checked and scanned before they
//! leave the building, and upstream failures map onto a small error
//! taxonomy (rate limited, quota exhausted, upstream error).

/// HTTP client for the chat-completions gateway
pub mod gateway;

/// Input bounds and prompt-injection screening
pub mod validation;

/// Proxy endpoint handlers
pub mod handlers;
