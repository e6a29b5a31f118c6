use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account.
///
/// The profile is a typed optional field populated at registration or by
/// a later profile update; callers test the option instead of probing
/// for attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub profile: Option<Profile>,
    pub created_at: DateTime<Utc>,
}

/// Optional public profile details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub bio: String,
    pub avatar_url: Option<String>,
}

/// A post made by a user.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A comment on a post.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A like on a post. At most one per (user, post), enforced by the
/// unique constraint on the pair.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Like {
    pub id: Uuid,
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A directed notice from an actor to a recipient about a target entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub actor_id: Uuid,
    pub verb: String,
    pub target: Option<TargetRef>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Kind tag for a notification target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Post,
    Comment,
    User,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Post => "post",
            TargetKind::Comment => "comment",
            TargetKind::User => "user",
        }
    }

    pub fn parse(s: &str) -> Option<TargetKind> {
        match s {
            "post" => Some(TargetKind::Post),
            "comment" => Some(TargetKind::Comment),
            "user" => Some(TargetKind::User),
            _ => None,
        }
    }
}

/// Tagged reference to the entity a notification is about. Stored as a
/// kind tag plus an id; each kind resolves against its own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRef {
    pub kind: TargetKind,
    pub id: Uuid,
}

impl TargetRef {
    pub fn post(id: Uuid) -> Self {
        Self {
            kind: TargetKind::Post,
            id,
        }
    }

    pub fn comment(id: Uuid) -> Self {
        Self {
            kind: TargetKind::Comment,
            id,
        }
    }

    pub fn user(id: Uuid) -> Self {
        Self {
            kind: TargetKind::User,
            id,
        }
    }
}

/// Result of a follow request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowOutcome {
    Followed,
    AlreadyFollowing,
}

/// Result of an unfollow request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnfollowOutcome {
    Unfollowed,
    NotFollowing,
}

/// One step of the like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LikeToggle {
    Liked,
    Unliked,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_kind_parse() {
        assert_eq!(TargetKind::parse("post"), Some(TargetKind::Post));
        assert_eq!(TargetKind::parse("comment"), Some(TargetKind::Comment));
        assert_eq!(TargetKind::parse("user"), Some(TargetKind::User));
        assert_eq!(TargetKind::parse("page"), None);
    }

    #[test]
    fn test_target_kind_tags_are_stable() {
        for kind in [TargetKind::Post, TargetKind::Comment, TargetKind::User] {
            assert_eq!(TargetKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_outcomes_serialize_as_snake_case() {
        assert_eq!(
            serde_json::to_value(FollowOutcome::AlreadyFollowing).unwrap(),
            serde_json::json!("already_following")
        );
        assert_eq!(
            serde_json::to_value(LikeToggle::Liked).unwrap(),
            serde_json::json!("liked")
        );
        assert_eq!(
            serde_json::to_value(UnfollowOutcome::NotFollowing).unwrap(),
            serde_json::json!("not_following")
        );
    }
}
