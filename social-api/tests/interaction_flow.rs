/// Database-backed tests for the interaction service: idempotent
/// follow/unfollow, the like toggle, notification fan-out on positive
/// transitions only, and the recipient's listing order.
mod support;

use social_api::domain::models::{FollowOutcome, LikeToggle, TargetKind, UnfollowOutcome};
use social_api::error::AppError;
use social_api::repository::{FollowRepository, LikeRepository};
use social_api::services::{
    InteractionService, NotificationService, VERB_LIKED_POST, VERB_STARTED_FOLLOWING,
};
use sqlx::PgPool;
use support::{create_post, create_user, test_pool};
use uuid::Uuid;

fn interactions(pool: &PgPool, notify_on_follow: bool) -> InteractionService {
    InteractionService::new(
        pool.clone(),
        NotificationService::new(pool.clone()),
        notify_on_follow,
    )
}

#[tokio::test]
async fn test_self_follow_is_rejected() {
    let Some(pool) = test_pool().await else { return };
    let u = create_user(&pool, "selfie").await;
    let svc = interactions(&pool, false);

    let err = svc.follow(u.id, u.id).await.unwrap_err();
    assert!(matches!(err, AppError::SelfFollow(_)));

    let err = svc.unfollow(u.id, u.id).await.unwrap_err();
    assert!(matches!(err, AppError::SelfFollow(_)));
}

#[tokio::test]
async fn test_follow_unknown_user_is_not_found() {
    let Some(pool) = test_pool().await else { return };
    let u = create_user(&pool, "follower").await;
    let svc = interactions(&pool, false);

    let err = svc.follow(u.id, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_follow_twice_yields_one_edge() {
    let Some(pool) = test_pool().await else { return };
    let a = create_user(&pool, "a").await;
    let b = create_user(&pool, "b").await;
    let svc = interactions(&pool, false);

    assert_eq!(svc.follow(a.id, b.id).await.unwrap(), FollowOutcome::Followed);
    assert_eq!(
        svc.follow(a.id, b.id).await.unwrap(),
        FollowOutcome::AlreadyFollowing
    );
    assert!(svc.is_following(a.id, b.id).await.unwrap());

    let followers = FollowRepository::new(pool.clone())
        .followers(b.id, 10, 0)
        .await
        .unwrap();
    assert_eq!(followers.len(), 1);
    assert_eq!(followers[0].id, a.id);

    // Follow notifications default off: b has heard nothing.
    let notices = NotificationService::new(pool.clone())
        .list_for(b.id, 10, 0)
        .await
        .unwrap();
    assert!(notices.is_empty());

    assert_eq!(
        svc.unfollow(a.id, b.id).await.unwrap(),
        UnfollowOutcome::Unfollowed
    );
    assert_eq!(
        svc.unfollow(a.id, b.id).await.unwrap(),
        UnfollowOutcome::NotFollowing
    );
    assert!(!svc.is_following(a.id, b.id).await.unwrap());
}

#[tokio::test]
async fn test_follow_notification_flag() {
    let Some(pool) = test_pool().await else { return };
    let a = create_user(&pool, "fan").await;
    let b = create_user(&pool, "star").await;
    let svc = interactions(&pool, true);

    svc.follow(a.id, b.id).await.unwrap();
    // Idempotent re-follow must not notify again.
    svc.follow(a.id, b.id).await.unwrap();

    let notices = NotificationService::new(pool.clone())
        .list_for(b.id, 10, 0)
        .await
        .unwrap();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].actor_id, a.id);
    assert_eq!(notices[0].verb, VERB_STARTED_FOLLOWING);
    let target = notices[0].target.expect("follow notice carries a user target");
    assert_eq!(target.kind, TargetKind::User);
    assert_eq!(target.id, a.id);
}

#[tokio::test]
async fn test_toggle_like_alternates() {
    let Some(pool) = test_pool().await else { return };
    let author = create_user(&pool, "author").await;
    let reader = create_user(&pool, "reader").await;
    let post = create_post(&pool, &author, "hello").await;
    let svc = interactions(&pool, false);

    assert_eq!(
        svc.toggle_like(reader.id, post.id).await.unwrap(),
        LikeToggle::Liked
    );
    assert!(svc.has_liked(reader.id, post.id).await.unwrap());

    assert_eq!(
        svc.toggle_like(reader.id, post.id).await.unwrap(),
        LikeToggle::Unliked
    );
    assert!(!svc.has_liked(reader.id, post.id).await.unwrap());

    assert_eq!(
        svc.toggle_like(reader.id, post.id).await.unwrap(),
        LikeToggle::Liked
    );
    assert!(svc.has_liked(reader.id, post.id).await.unwrap());
}

#[tokio::test]
async fn test_toggle_like_missing_post_is_not_found() {
    let Some(pool) = test_pool().await else { return };
    let u = create_user(&pool, "liker").await;
    let svc = interactions(&pool, false);

    let err = svc.toggle_like(u.id, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = svc.unlike(u.id, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_only_liked_transitions_notify() {
    let Some(pool) = test_pool().await else { return };
    let author = create_user(&pool, "author").await;
    let reader = create_user(&pool, "reader").await;
    let post = create_post(&pool, &author, "toggle me").await;
    let svc = interactions(&pool, false);

    // LIKE, UNLIKE, LIKE: two positive transitions, two notices.
    svc.toggle_like(reader.id, post.id).await.unwrap();
    svc.toggle_like(reader.id, post.id).await.unwrap();
    svc.toggle_like(reader.id, post.id).await.unwrap();

    let notices = NotificationService::new(pool.clone())
        .list_for(author.id, 10, 0)
        .await
        .unwrap();
    assert_eq!(notices.len(), 2);
    for n in &notices {
        assert_eq!(n.recipient_id, author.id);
        assert_eq!(n.actor_id, reader.id);
        assert_eq!(n.verb, VERB_LIKED_POST);
        let target = n.target.expect("like notice carries a post target");
        assert_eq!(target.kind, TargetKind::Post);
        assert_eq!(target.id, post.id);
    }
}

#[tokio::test]
async fn test_like_then_unlike_leaves_one_notification() {
    let Some(pool) = test_pool().await else { return };
    let author = create_user(&pool, "author").await;
    let reader = create_user(&pool, "reader").await;
    let post = create_post(&pool, &author, "nice post").await;
    let svc = interactions(&pool, false);
    let notifications = NotificationService::new(pool.clone());

    assert_eq!(
        svc.toggle_like(reader.id, post.id).await.unwrap(),
        LikeToggle::Liked
    );
    assert_eq!(
        svc.toggle_like(reader.id, post.id).await.unwrap(),
        LikeToggle::Unliked
    );

    let notices = notifications.list_for(author.id, 10, 0).await.unwrap();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].verb, VERB_LIKED_POST);
}

#[tokio::test]
async fn test_explicit_unlike_is_idempotent_and_silent() {
    let Some(pool) = test_pool().await else { return };
    let author = create_user(&pool, "author").await;
    let reader = create_user(&pool, "reader").await;
    let post = create_post(&pool, &author, "quiet").await;
    let svc = interactions(&pool, false);

    svc.toggle_like(reader.id, post.id).await.unwrap();
    assert!(svc.unlike(reader.id, post.id).await.unwrap());
    assert!(!svc.unlike(reader.id, post.id).await.unwrap());
    assert!(!svc.has_liked(reader.id, post.id).await.unwrap());

    let notices = NotificationService::new(pool.clone())
        .list_for(author.id, 10, 0)
        .await
        .unwrap();
    assert_eq!(notices.len(), 1);
}

#[tokio::test]
async fn test_concurrent_like_inserts_settle_on_one_row() {
    let Some(pool) = test_pool().await else { return };
    let author = create_user(&pool, "author").await;
    let reader = create_user(&pool, "reader").await;
    let post = create_post(&pool, &author, "contended").await;
    let likes = LikeRepository::new(pool.clone());

    let (a, b) = tokio::join!(
        likes.insert(reader.id, post.id),
        likes.insert(reader.id, post.id)
    );
    let wins = [a.unwrap(), b.unwrap()]
        .iter()
        .filter(|r| r.is_some())
        .count();
    assert_eq!(wins, 1);
    assert_eq!(likes.count_for_post(post.id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_concurrent_toggles_notify_exactly_once() {
    let Some(pool) = test_pool().await else { return };
    let author = create_user(&pool, "author").await;
    let reader = create_user(&pool, "reader").await;
    let post = create_post(&pool, &author, "double tap").await;
    let svc = interactions(&pool, false);

    // Whichever way the two requests interleave, only one positive
    // transition can win the unique constraint, so the author hears
    // about it exactly once and at most one row survives.
    let (a, b) = tokio::join!(
        svc.toggle_like(reader.id, post.id),
        svc.toggle_like(reader.id, post.id)
    );
    a.unwrap();
    b.unwrap();

    let notices = NotificationService::new(pool.clone())
        .list_for(author.id, 10, 0)
        .await
        .unwrap();
    assert_eq!(notices.len(), 1);
    assert!(
        LikeRepository::new(pool.clone())
            .count_for_post(post.id)
            .await
            .unwrap()
            <= 1
    );
}

#[tokio::test]
async fn test_notification_listing_order_and_scoping() {
    let Some(pool) = test_pool().await else { return };
    let recipient = create_user(&pool, "recipient").await;
    let other = create_user(&pool, "other").await;
    let actor = create_user(&pool, "actor").await;
    let notifications = NotificationService::new(pool.clone());

    let first = notifications
        .append(recipient.id, actor.id, "liked your post", None)
        .await
        .unwrap();
    let second = notifications
        .append(recipient.id, actor.id, "liked your post", None)
        .await
        .unwrap();
    let third = notifications
        .append(recipient.id, actor.id, "started following you", None)
        .await
        .unwrap();

    // Reading the newest one pushes it behind every unread notice,
    // regardless of timestamps.
    notifications.mark_read(recipient.id, third.id).await.unwrap();

    let listed = notifications.list_for(recipient.id, 10, 0).await.unwrap();
    let ids: Vec<_> = listed.iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![second.id, first.id, third.id]);
    assert!(!listed[0].read && !listed[1].read && listed[2].read);

    assert_eq!(notifications.unread_count(recipient.id).await.unwrap(), 2);

    // Another user's notification id behaves like a missing one.
    let err = notifications.mark_read(other.id, first.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    let err = notifications.delete(other.id, first.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // The recipient can drop a notice explicitly.
    notifications.delete(recipient.id, third.id).await.unwrap();
    let listed = notifications.list_for(recipient.id, 10, 0).await.unwrap();
    assert_eq!(listed.len(), 2);
}

#[tokio::test]
async fn test_self_like_is_permitted_and_notifies_author() {
    let Some(pool) = test_pool().await else { return };
    let author = create_user(&pool, "narcissus").await;
    let post = create_post(&pool, &author, "my own post").await;
    let svc = interactions(&pool, false);

    assert_eq!(
        svc.toggle_like(author.id, post.id).await.unwrap(),
        LikeToggle::Liked
    );

    let notices = NotificationService::new(pool.clone())
        .list_for(author.id, 10, 0)
        .await
        .unwrap();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].actor_id, author.id);
    assert_eq!(notices[0].recipient_id, author.id);
}
