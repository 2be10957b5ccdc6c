//! Messaging Module
//!
//! The messaging domain: channels (owner-broadcast-only), groups
//! (any-member posting), and direct messages (two-party threads), plus
//! saved-message bookmarks.
//!
//! The three message kinds share one authorization path (`scope`)
//! instead of three near-identical copies: `MessageKind` tags the
//! conversation kind, `ScopeFacts` carries the loaded membership and
//! ownership facts, and a single set of pure functions decides post/
//! read/edit/delete. Handlers load facts from the database, run the
//! decision, and
//! only then touch message rows. The checks live at the data-access
//! boundary, not in any UI.

/// Scope types and authorization rules
pub mod scope;

/// Database operations for channels, groups, direct messages, bookmarks
pub mod db;

/// HTTP handlers
pub mod handlers;

pub use scope::{MessageKind, ScopeFacts};
