/**
 * Message Scopes and Authorization Rules
 *
 * One authorization path for all three message kinds. A message lives
 * in a scope:
 *
 * - **Channel**: only the channel owner posts; any member reads
 * - **Group**: any member posts and reads
 * - **Direct**: the two users of the (sender, receiver) pair
 *
 * Edit and delete are author-gated uniformly: only the original author
 * of a message may change or remove it, regardless of scope. Edits set
 * `is_edited` and overwrite the content destructively; no history is
 * kept.
 *
 * The functions here are pure: callers load `ScopeFacts` from the
 * database and pass the actor explicitly, which keeps every rule
 * testable without a simulated session.
 */

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// Maximum message length in characters, after trimming
pub const MAX_MESSAGE_LEN: usize = 5000;

/// The three message kinds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Channel,
    Group,
    Direct,
}

impl MessageKind {
    /// Tag used in the saved_messages table and URLs
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Channel => "channel",
            MessageKind::Group => "group",
            MessageKind::Direct => "direct",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "channel" => Some(MessageKind::Channel),
            "group" => Some(MessageKind::Group),
            "direct" => Some(MessageKind::Direct),
            _ => None,
        }
    }

    /// Table the messages of this kind live in
    pub fn table(&self) -> &'static str {
        match self {
            MessageKind::Channel => "channel_messages",
            MessageKind::Group => "group_messages",
            MessageKind::Direct => "direct_messages",
        }
    }
}

/// Membership and ownership facts loaded for one (scope, actor) pair
///
/// Loaded from the database by the handlers; the decision functions
/// below never query anything themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeFacts {
    Channel {
        owner_id: Uuid,
        actor_is_member: bool,
    },
    Group {
        actor_is_member: bool,
    },
    Direct {
        sender_id: Uuid,
        receiver_id: Uuid,
    },
}

/// Validate and normalize message content
///
/// Content must be non-empty after trimming and at most
/// `MAX_MESSAGE_LEN` characters. Over-length content is rejected, never
/// truncated.
pub fn validate_content(content: &str) -> Result<String, ApiError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("پیام نمی‌تواند خالی باشد"));
    }
    if trimmed.chars().count() > MAX_MESSAGE_LEN {
        return Err(ApiError::validation("پیام حداکثر ۵۰۰۰ کاراکتر است"));
    }
    Ok(trimmed.to_string())
}

/// May `actor` create a message in this scope?
///
/// - Channel: actor must be the owner
/// - Group: actor must be a member
/// - Direct: actor must be the sender side of the pair being written
pub fn authorize_post(facts: &ScopeFacts, actor: Uuid) -> Result<(), ApiError> {
    match facts {
        ScopeFacts::Channel { owner_id, .. } => {
            if *owner_id == actor {
                Ok(())
            } else {
                Err(ApiError::forbidden("فقط مالک کانال می‌تواند پیام ارسال کند"))
            }
        }
        ScopeFacts::Group { actor_is_member } => {
            if *actor_is_member {
                Ok(())
            } else {
                Err(ApiError::forbidden("شما عضو این گروه نیستید"))
            }
        }
        ScopeFacts::Direct { sender_id, .. } => {
            // A user can only send as themselves
            if *sender_id == actor {
                Ok(())
            } else {
                Err(ApiError::forbidden("ارسال پیام از طرف کاربر دیگر مجاز نیست"))
            }
        }
    }
}

/// May `actor` read messages in this scope?
pub fn authorize_read(facts: &ScopeFacts, actor: Uuid) -> Result<(), ApiError> {
    let allowed = match facts {
        ScopeFacts::Channel {
            owner_id,
            actor_is_member,
        } => *actor_is_member || *owner_id == actor,
        ScopeFacts::Group { actor_is_member } => *actor_is_member,
        ScopeFacts::Direct {
            sender_id,
            receiver_id,
        } => *sender_id == actor || *receiver_id == actor,
    };

    if allowed {
        Ok(())
    } else {
        Err(ApiError::forbidden("دسترسی به این گفتگو مجاز نیست"))
    }
}

/// May `actor` edit or delete a message authored by `author_id`?
///
/// Author-gated uniformly across all three kinds.
pub fn authorize_author_action(author_id: Uuid, actor: Uuid) -> Result<(), ApiError> {
    if author_id == actor {
        Ok(())
    } else {
        Err(ApiError::forbidden("فقط نویسنده پیام مجاز است"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uuids() -> (Uuid, Uuid) {
        (Uuid::new_v4(), Uuid::new_v4())
    }

    #[test]
    fn test_channel_post_restricted_to_owner() {
        let (owner, member) = uuids();
        let facts = ScopeFacts::Channel {
            owner_id: owner,
            actor_is_member: true,
        };

        assert!(authorize_post(&facts, owner).is_ok());
        assert!(matches!(
            authorize_post(&facts, member),
            Err(ApiError::Forbidden(_))
        ));
    }

    #[test]
    fn test_group_post_open_to_members() {
        let (member, outsider) = uuids();
        assert!(authorize_post(&ScopeFacts::Group { actor_is_member: true }, member).is_ok());
        assert!(matches!(
            authorize_post(&ScopeFacts::Group { actor_is_member: false }, outsider),
            Err(ApiError::Forbidden(_))
        ));
    }

    #[test]
    fn test_direct_post_only_as_self() {
        let (sender, receiver) = uuids();
        let facts = ScopeFacts::Direct {
            sender_id: sender,
            receiver_id: receiver,
        };

        assert!(authorize_post(&facts, sender).is_ok());
        // The receiver cannot insert a row claiming the sender wrote it
        assert!(authorize_post(&facts, receiver).is_err());
    }

    #[test]
    fn test_read_requires_membership_or_pair() {
        let (owner, member) = uuids();
        let outsider = Uuid::new_v4();

        let channel = ScopeFacts::Channel {
            owner_id: owner,
            actor_is_member: false,
        };
        assert!(authorize_read(&channel, owner).is_ok());
        assert!(authorize_read(&channel, outsider).is_err());

        let dm = ScopeFacts::Direct {
            sender_id: owner,
            receiver_id: member,
        };
        assert!(authorize_read(&dm, owner).is_ok());
        assert!(authorize_read(&dm, member).is_ok());
        assert!(authorize_read(&dm, outsider).is_err());
    }

    #[test]
    fn test_edit_delete_author_gated() {
        let (author, other) = uuids();
        assert!(authorize_author_action(author, author).is_ok());
        assert!(matches!(
            authorize_author_action(author, other),
            Err(ApiError::Forbidden(_))
        ));
    }

    #[test]
    fn test_content_must_be_nonempty_after_trim() {
        assert!(validate_content("").is_err());
        assert!(validate_content("   \n\t ").is_err());
        assert_eq!(validate_content("  سلام  ").unwrap(), "سلام");
    }

    #[test]
    fn test_content_length_bound() {
        let at_limit = "x".repeat(MAX_MESSAGE_LEN);
        assert!(validate_content(&at_limit).is_ok());

        let over_limit = "x".repeat(MAX_MESSAGE_LEN + 1);
        assert!(matches!(
            validate_content(&over_limit),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn test_length_bound_counts_chars_not_bytes() {
        // 5000 multi-byte characters are within the limit
        let persian = "م".repeat(MAX_MESSAGE_LEN);
        assert!(validate_content(&persian).is_ok());
    }

    #[test]
    fn test_kind_round_trip() {
        for kind in [MessageKind::Channel, MessageKind::Group, MessageKind::Direct] {
            assert_eq!(MessageKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(MessageKind::from_str("unknown"), None);
    }
}
