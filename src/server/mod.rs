//! Server Module
//!
//! Initialization and configuration of the Axum HTTP server.
//!
//! - **`state`** - Application state structure and `FromRef` implementations
//! - **`config`** - Configuration loading (database, AI gateway)
//! - **`init`** - Server initialization and app creation
//!
//! # Initialization Flow
//!
//! 1. Load database pool from `DATABASE_URL` and run migrations
//! 2. Load AI gateway settings from the environment
//! 3. Create the change-event broadcast channel
//! 4. Assemble the router with all routes and middleware

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

// Re-export commonly used types
pub use init::create_app;
pub use state::AppState;
