//! StudyHub Backend
//!
//! Server-side implementation of the StudyHub study-helper platform.
//! It provides an Axum HTTP API with JWT authentication, PostgreSQL
//! persistence, a three-scope messaging domain (channels, groups, direct
//! messages), friendships, server-authoritative exam scoring, study
//! plans, AI-proxy endpoints, and a real-time change feed over SSE.
//!
//! # Module Structure
//!
//! ```text
//! src/
//! ├── server/      - Server initialization, configuration, state
//! ├── routes/      - Route configuration
//! ├── error/       - API error taxonomy
//! ├── auth/        - Users, JWT sessions, signup/login handlers
//! ├── middleware/  - Request authentication middleware
//! ├── profiles/    - Profiles, points, page views, admin stats
//! ├── chat/        - Channels, groups, direct messages, bookmarks
//! ├── friends/     - Friend requests and friendships
//! ├── exams/       - Server-side exam scoring and history
//! ├── plans/       - Study plan CRUD
//! ├── ai/          - AI gateway client and proxy handlers
//! └── realtime/    - Change-event broadcasting and SSE subscription
//! ```

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// API error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Profiles, points, and analytics
pub mod profiles;

/// Messaging domain: channels, groups, direct messages, bookmarks
pub mod chat;

/// Friend requests and friendships
pub mod friends;

/// Exam scoring and history
pub mod exams;

/// Study plans
pub mod plans;

/// AI gateway proxy
pub mod ai;

/// Real-time change feed
pub mod realtime;

// Re-export commonly used types
pub use error::ApiError;
pub use server::create_app;
pub use server::state::AppState;
