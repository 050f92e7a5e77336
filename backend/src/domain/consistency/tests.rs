//! Maintainer behaviour over mocked stores.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;

use super::*;
use crate::domain::comment::CommentId;
use crate::domain::credentials::{Password, PasswordHash};
use crate::domain::ports::{
    MockCommentRepository, MockItemRepository, MockUserRepository, UserPersistenceError,
};
use crate::domain::user::{Email, User, UserId, Username};

fn maintainer(
    users: MockUserRepository,
    items: MockItemRepository,
    comments: MockCommentRepository,
) -> ConsistencyMaintainer {
    let options = ConsistencyOptions {
        base_backoff: std::time::Duration::from_millis(1),
        ..ConsistencyOptions::default()
    };
    ConsistencyMaintainer::new(Arc::new(users), Arc::new(items), Arc::new(comments), options)
}

fn sample_user(name: &str) -> User {
    let password = Password::new("pw").expect("password");
    let hash = PasswordHash::derive_with_rounds(&password, 1_000).expect("hash");
    User::new(
        UserId::random(),
        Username::new(name).expect("username"),
        Email::new(format!("{name}@example.com")).expect("email"),
        hash,
        Utc::now(),
    )
}

#[tokio::test]
async fn recompute_writes_the_fresh_scan_result() {
    let item_id = ItemId::random();
    let mut users = MockUserRepository::new();
    users
        .expect_count_favoriting()
        .withf(move |id| *id == item_id)
        .times(1)
        .return_once(|_| Ok(7));
    let mut items = MockItemRepository::new();
    items
        .expect_set_favorites_count()
        .withf(move |id, count| *id == item_id && *count == 7)
        .times(1)
        .return_once(|_, _| Ok(true));

    let maintainer = maintainer(users, items, MockCommentRepository::new());
    maintainer
        .recompute_favorites_count(item_id)
        .await
        .expect("recompute succeeds");
}

#[tokio::test]
async fn recompute_tolerates_a_listing_deleted_underneath_it() {
    let item_id = ItemId::random();
    let mut users = MockUserRepository::new();
    users.expect_count_favoriting().return_once(|_| Ok(3));
    let mut items = MockItemRepository::new();
    items
        .expect_set_favorites_count()
        .return_once(|_, _| Ok(false));

    let maintainer = maintainer(users, items, MockCommentRepository::new());
    maintainer
        .recompute_favorites_count(item_id)
        .await
        .expect("a vanished listing is not an error");
}

#[tokio::test]
async fn recompute_retries_transient_failures() {
    let item_id = ItemId::random();
    let mut users = MockUserRepository::new();
    let mut attempts = 0;
    users.expect_count_favoriting().times(2).returning(move |_| {
        attempts += 1;
        if attempts == 1 {
            Err(UserPersistenceError::unavailable("connection reset"))
        } else {
            Ok(1)
        }
    });
    let mut items = MockItemRepository::new();
    items
        .expect_set_favorites_count()
        .times(1)
        .return_once(|_, _| Ok(true));

    let maintainer = maintainer(users, items, MockCommentRepository::new());
    maintainer
        .recompute_favorites_count(item_id)
        .await
        .expect("second attempt succeeds");
}

#[tokio::test]
async fn recompute_gives_up_after_the_attempt_budget() {
    let item_id = ItemId::random();
    let mut users = MockUserRepository::new();
    users
        .expect_count_favoriting()
        .times(3)
        .returning(|_| Err(UserPersistenceError::unavailable("still down")));

    let maintainer = maintainer(
        users,
        MockItemRepository::new(),
        MockCommentRepository::new(),
    );
    let err = maintainer
        .recompute_favorites_count(item_id)
        .await
        .expect_err("exhausted retries surface the failure");
    assert_eq!(err.code(), crate::domain::ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn cascade_removes_comments_then_the_listing() {
    let item_id = ItemId::random();
    let mut comments = MockCommentRepository::new();
    comments
        .expect_delete_for_item()
        .withf(move |id| *id == item_id)
        .times(1)
        .return_once(|_| Ok(4));
    let mut items = MockItemRepository::new();
    items
        .expect_delete()
        .withf(move |id| *id == item_id)
        .times(1)
        .return_once(|_| Ok(true));

    let maintainer = maintainer(MockUserRepository::new(), items, comments);
    maintainer
        .cascade_delete_item(item_id)
        .await
        .expect("cascade succeeds");
}

#[tokio::test]
async fn cascade_is_idempotent_over_an_already_deleted_listing() {
    let item_id = ItemId::random();
    let mut comments = MockCommentRepository::new();
    comments.expect_delete_for_item().return_once(|_| Ok(0));
    let mut items = MockItemRepository::new();
    items.expect_delete().return_once(|_| Ok(false));

    let maintainer = maintainer(MockUserRepository::new(), items, comments);
    maintainer
        .cascade_delete_item(item_id)
        .await
        .expect("re-running a cascade is a no-op");
}

#[tokio::test]
async fn detach_deletes_the_comment_even_when_the_listing_is_gone() {
    let item_id = ItemId::random();
    let comment_id = CommentId::random();
    let mut items = MockItemRepository::new();
    items.expect_find_by_id().return_once(|_| Ok(None));
    let mut comments = MockCommentRepository::new();
    comments
        .expect_delete()
        .withf(move |id| *id == comment_id)
        .times(1)
        .return_once(|_| Ok(true));

    let maintainer = maintainer(MockUserRepository::new(), items, comments);
    maintainer
        .detach_comment(item_id, comment_id)
        .await
        .expect("orphan comment still deleted");
}

#[tokio::test]
async fn compaction_prunes_only_dangling_references() {
    let live = ItemId::random();
    let dead = ItemId::random();

    let mut clean = sample_user("clean");
    clean.insert_favorite(live);
    let mut stale = sample_user("stale");
    stale.insert_favorite(live);
    stale.insert_favorite(dead);

    let mut items = MockItemRepository::new();
    items
        .expect_list_ids()
        .return_once(move || Ok(BTreeSet::from([live])));
    let mut users = MockUserRepository::new();
    users
        .expect_list_all()
        .return_once(move || Ok(vec![clean, stale]));
    users
        .expect_update()
        .withf(move |user| user.username().as_ref() == "stale" && !user.has_favorited(dead))
        .times(1)
        .return_once(|_| Ok(()));

    let maintainer = maintainer(users, items, MockCommentRepository::new());
    let pruned = maintainer
        .compact_favorites()
        .await
        .expect("sweep succeeds");
    assert_eq!(pruned, 1);
}
