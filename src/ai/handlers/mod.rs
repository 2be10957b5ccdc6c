//! AI proxy endpoint handlers.
//!
//! All endpoints require authentication, validate their inputs with
//! `ai::validation`, and forward to the gateway with a fixed Persian
//! system prompt. The group-chat endpoint additionally writes the
//! model's reply into the group as the reserved assistant user.

/// Question answering
pub mod answer;

/// Summarize / explain study material
pub mod summarize;

/// Structured exam generation via a forced tool call
pub mod exam_generator;

/// Study consultation chat
pub mod consultation;

/// Study planner chat
pub mod study_planner;

/// Image analysis
pub mod image_analysis;

/// In-group assistant replies
pub mod group_chat;
