/// Follow/unfollow and like toggling.
///
/// Each (actor, target) pair is either inactive or active; only the
/// inactive-to-active transition emits a notification. Concurrent
/// duplicate requests are settled by the unique constraints: a lost
/// insert or delete race is answered with the state the winner
/// established, never surfaced as an error.
use crate::domain::models::{FollowOutcome, LikeToggle, TargetRef, UnfollowOutcome};
use crate::error::{AppError, Result};
use crate::repository::{FollowRepository, LikeRepository, PostRepository, UserRepository};
use crate::services::NotificationService;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

pub const VERB_LIKED_POST: &str = "liked your post";
pub const VERB_STARTED_FOLLOWING: &str = "started following you";

#[derive(Clone)]
pub struct InteractionService {
    users: UserRepository,
    posts: PostRepository,
    follows: FollowRepository,
    likes: LikeRepository,
    notifications: NotificationService,
    notify_on_follow: bool,
}

impl InteractionService {
    pub fn new(pool: PgPool, notifications: NotificationService, notify_on_follow: bool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            posts: PostRepository::new(pool.clone()),
            follows: FollowRepository::new(pool.clone()),
            likes: LikeRepository::new(pool),
            notifications,
            notify_on_follow,
        }
    }

    /// Follow another user. Idempotent: an existing edge reports
    /// `AlreadyFollowing` without mutation and without a notification.
    pub async fn follow(&self, actor_id: Uuid, target_id: Uuid) -> Result<FollowOutcome> {
        if actor_id == target_id {
            return Err(AppError::SelfFollow("follow"));
        }
        if !self.users.exists(target_id).await? {
            return Err(AppError::NotFound(format!("user {}", target_id)));
        }

        if !self.follows.insert(actor_id, target_id).await? {
            return Ok(FollowOutcome::AlreadyFollowing);
        }

        debug!(%actor_id, %target_id, "follow edge created");
        if self.notify_on_follow {
            self.notifications
                .append_or_log(
                    target_id,
                    actor_id,
                    VERB_STARTED_FOLLOWING,
                    Some(TargetRef::user(actor_id)),
                )
                .await;
        }
        Ok(FollowOutcome::Followed)
    }

    /// Unfollow another user. Removing a missing edge is a no-op, not an
    /// error; unfollowing never notifies.
    pub async fn unfollow(&self, actor_id: Uuid, target_id: Uuid) -> Result<UnfollowOutcome> {
        if actor_id == target_id {
            return Err(AppError::SelfFollow("unfollow"));
        }
        if !self.users.exists(target_id).await? {
            return Err(AppError::NotFound(format!("user {}", target_id)));
        }

        if self.follows.delete(actor_id, target_id).await? {
            Ok(UnfollowOutcome::Unfollowed)
        } else {
            Ok(UnfollowOutcome::NotFollowing)
        }
    }

    pub async fn is_following(&self, actor_id: Uuid, target_id: Uuid) -> Result<bool> {
        Ok(self.follows.exists(actor_id, target_id).await?)
    }

    /// Toggle the actor's like on a post. Only the liking transition
    /// notifies the post's author.
    pub async fn toggle_like(&self, actor_id: Uuid, post_id: Uuid) -> Result<LikeToggle> {
        let post = self
            .posts
            .get(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))?;

        if !self.likes.exists(actor_id, post_id).await? {
            if self.likes.insert(actor_id, post_id).await?.is_some() {
                self.notifications
                    .append_or_log(
                        post.author_id,
                        actor_id,
                        VERB_LIKED_POST,
                        Some(TargetRef::post(post.id)),
                    )
                    .await;
                return Ok(LikeToggle::Liked);
            }
            // Insert lost a race: the row exists now. Report the state
            // the winner established; the winner already notified.
            debug!(%actor_id, %post_id, "like insert raced, re-reading state");
            return self.current_like_state(actor_id, post_id).await;
        }

        if self.likes.delete(actor_id, post_id).await? {
            return Ok(LikeToggle::Unliked);
        }
        // Delete lost a race; answer with whatever is true now.
        debug!(%actor_id, %post_id, "like delete raced, re-reading state");
        self.current_like_state(actor_id, post_id).await
    }

    /// Explicitly remove a like. Idempotent; never notifies. Returns
    /// true if a like was removed.
    pub async fn unlike(&self, actor_id: Uuid, post_id: Uuid) -> Result<bool> {
        if !self.posts.exists(post_id).await? {
            return Err(AppError::NotFound(format!("post {}", post_id)));
        }
        Ok(self.likes.delete(actor_id, post_id).await?)
    }

    pub async fn has_liked(&self, actor_id: Uuid, post_id: Uuid) -> Result<bool> {
        Ok(self.likes.exists(actor_id, post_id).await?)
    }

    async fn current_like_state(&self, actor_id: Uuid, post_id: Uuid) -> Result<LikeToggle> {
        Ok(if self.likes.exists(actor_id, post_id).await? {
            LikeToggle::Liked
        } else {
            LikeToggle::Unliked
        })
    }
}
