//! Messaging HTTP Handlers
//!
//! Route handlers for channels, groups, direct messages, unified
//! message edit/delete, and bookmarks. Every mutation follows the same
//! shape: extract the authenticated user, load scope facts, authorize
//! via `chat::scope`, write, then broadcast a change event.

use crate::error::ApiError;

/// Channel endpoints
pub mod channels;

/// Group endpoints
pub mod groups;

/// Direct-message endpoints
pub mod direct;

/// Unified edit/delete for all three message kinds
pub mod messages;

/// Saved-message bookmark endpoints
pub mod saved;

/// Validate a channel or group name: 3-100 characters after trimming
pub fn validate_name(name: &str) -> Result<String, ApiError> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();
    if len < 3 {
        return Err(ApiError::validation("نام حداقل ۳ کاراکتر است"));
    }
    if len > 100 {
        return Err(ApiError::validation("نام حداکثر ۱۰۰ کاراکتر است"));
    }
    Ok(trimmed.to_string())
}

/// Validate a description: at most 500 characters after trimming
pub fn validate_description(description: &str) -> Result<String, ApiError> {
    let trimmed = description.trim();
    if trimmed.chars().count() > 500 {
        return Err(ApiError::validation("توضیحات حداکثر ۵۰۰ کاراکتر است"));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_bounds() {
        assert!(validate_name("ab").is_err());
        assert_eq!(validate_name("  ریاضی دهم ").unwrap(), "ریاضی دهم");
        assert!(validate_name(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_description_bound() {
        assert!(validate_description("").is_ok());
        assert!(validate_description(&"x".repeat(501)).is_err());
    }
}
