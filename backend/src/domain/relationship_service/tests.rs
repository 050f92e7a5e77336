//! Relationship service behaviour over mocked stores.

use chrono::Utc;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::consistency::ConsistencyOptions;
use crate::domain::credentials::{Password, PasswordHash};
use crate::domain::item::{ItemDraft, ItemId};
use crate::domain::ports::{MockCommentRepository, MockItemRepository, MockUserRepository};
use crate::domain::slug::Slug;
use crate::domain::user::{Email, UserId, Username};

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

fn sample_item(seller: &User, title: &str) -> Item {
    let draft = ItemDraft::try_new(title, "desc", "body", Vec::new()).expect("draft validates");
    let slug = Slug::generate(title, &mut rand::thread_rng());
    Item::create(ItemId::random(), slug, draft, seller.id(), Utc::now())
}

struct Fixture {
    users: MockUserRepository,
    items: MockItemRepository,
    maintainer_users: MockUserRepository,
    maintainer_items: MockItemRepository,
}

impl Fixture {
    fn new() -> Self {
        Self {
            users: MockUserRepository::new(),
            items: MockItemRepository::new(),
            maintainer_users: MockUserRepository::new(),
            maintainer_items: MockItemRepository::new(),
        }
    }

    fn build(self) -> RelationshipService {
        let maintainer = Arc::new(ConsistencyMaintainer::new(
            Arc::new(self.maintainer_users),
            Arc::new(self.maintainer_items),
            Arc::new(MockCommentRepository::new()),
            ConsistencyOptions::default(),
        ));
        RelationshipService::new(Arc::new(self.users), Arc::new(self.items), maintainer)
    }
}

#[tokio::test]
async fn favorite_updates_the_set_and_recomputes_the_tally() {
    let seller = sample_user("ada");
    let fan = sample_user("bob");
    let identity = Identity::new(fan.id(), fan.role());
    let item = sample_item(&seller, "Bike");
    let item_id = item.id();
    let slug = item.slug().to_string();

    let mut fixture = Fixture::new();
    let first = item.clone();
    let mut refreshed = item.clone();
    refreshed.set_favorites_count(1);
    let mut lookups = 0;
    fixture.items.expect_find_by_slug().times(2).returning(move |_| {
        lookups += 1;
        if lookups == 1 {
            Ok(Some(first.clone()))
        } else {
            Ok(Some(refreshed.clone()))
        }
    });
    let acting = fan.clone();
    let seller_record = seller.clone();
    fixture
        .users
        .expect_find_by_id()
        .returning(move |id| {
            if *id == acting.id() {
                Ok(Some(acting.clone()))
            } else {
                Ok(Some(seller_record.clone()))
            }
        });
    fixture
        .users
        .expect_update()
        .withf(move |user| user.has_favorited(item_id))
        .times(1)
        .return_once(|_| Ok(()));
    fixture
        .maintainer_users
        .expect_count_favoriting()
        .return_once(|_| Ok(1));
    fixture
        .maintainer_items
        .expect_set_favorites_count()
        .withf(move |id, count| *id == item_id && *count == 1)
        .times(1)
        .return_once(|_, _| Ok(true));

    let view = fixture
        .build()
        .favorite(identity, &slug)
        .await
        .expect("favorite succeeds");
    assert!(view.favorited);
    assert_eq!(view.favorites_count, 1);
}

#[tokio::test]
async fn repeating_a_favorite_skips_the_write_and_the_recompute() {
    let seller = sample_user("ada");
    let mut fan = sample_user("bob");
    let item = sample_item(&seller, "Bike");
    fan.insert_favorite(item.id());
    let identity = Identity::new(fan.id(), fan.role());
    let slug = item.slug().to_string();

    let mut fixture = Fixture::new();
    let record = item.clone();
    fixture
        .items
        .expect_find_by_slug()
        .times(2)
        .returning(move |_| Ok(Some(record.clone())));
    let acting = fan.clone();
    let seller_record = seller.clone();
    fixture.users.expect_find_by_id().returning(move |id| {
        if *id == acting.id() {
            Ok(Some(acting.clone()))
        } else {
            Ok(Some(seller_record.clone()))
        }
    });
    fixture.users.expect_update().times(0);
    fixture.maintainer_users.expect_count_favoriting().times(0);

    fixture
        .build()
        .favorite(identity, &slug)
        .await
        .expect("idempotent repeat");
}

#[tokio::test]
async fn favoriting_a_missing_listing_fails_with_not_found() {
    let fan = sample_user("bob");
    let identity = Identity::new(fan.id(), fan.role());

    let mut fixture = Fixture::new();
    fixture.items.expect_find_by_slug().return_once(|_| Ok(None));

    let err = fixture
        .build()
        .favorite(identity, "gone")
        .await
        .expect_err("missing listing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn self_follow_is_a_validation_error() {
    let ada = sample_user("ada");
    let identity = Identity::new(ada.id(), ada.role());

    let mut fixture = Fixture::new();
    let record = ada.clone();
    fixture
        .users
        .expect_find_by_username()
        .return_once(move |_| Ok(Some(record)));
    fixture.users.expect_update().times(0);

    let err = fixture
        .build()
        .follow(identity, "ada")
        .await
        .expect_err("self-follow rejected");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn follow_is_idempotent() {
    let ada = sample_user("ada");
    let mut bob = sample_user("bob");
    bob.insert_following(ada.id());
    let identity = Identity::new(bob.id(), bob.role());

    let mut fixture = Fixture::new();
    let target = ada.clone();
    fixture
        .users
        .expect_find_by_username()
        .return_once(move |_| Ok(Some(target)));
    let acting = bob.clone();
    fixture
        .users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(acting)));
    fixture.users.expect_update().times(0);

    let view = fixture
        .build()
        .follow(identity, "ada")
        .await
        .expect("repeat follow is a no-op");
    assert!(view.following);
}

#[tokio::test]
async fn unfollow_removes_the_edge() {
    let ada = sample_user("ada");
    let ada_id = ada.id();
    let mut bob = sample_user("bob");
    bob.insert_following(ada.id());
    let identity = Identity::new(bob.id(), bob.role());

    let mut fixture = Fixture::new();
    let target = ada.clone();
    fixture
        .users
        .expect_find_by_username()
        .return_once(move |_| Ok(Some(target)));
    let acting = bob.clone();
    fixture
        .users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(acting)));
    fixture
        .users
        .expect_update()
        .withf(move |user| !user.is_following(ada_id))
        .times(1)
        .return_once(|_| Ok(()));

    let view = fixture
        .build()
        .unfollow(identity, "ada")
        .await
        .expect("unfollow succeeds");
    assert!(!view.following);
}

#[tokio::test]
async fn profiles_reflect_the_viewer_perspective() {
    let ada = sample_user("ada");
    let mut bob = sample_user("bob");
    bob.insert_following(ada.id());

    let mut fixture = Fixture::new();
    let target = ada.clone();
    fixture
        .users
        .expect_find_by_username()
        .returning(move |_| Ok(Some(target.clone())));
    let viewer = bob.clone();
    fixture
        .users
        .expect_find_by_id()
        .returning(move |_| Ok(Some(viewer.clone())));

    let service = fixture.build();
    let viewed = service
        .fetch_profile("ada", Some(Identity::new(bob.id(), bob.role())))
        .await
        .expect("profile resolves");
    assert!(viewed.following);

    let anonymous = service
        .fetch_profile("ada", None)
        .await
        .expect("profile resolves");
    assert!(!anonymous.following);
}
