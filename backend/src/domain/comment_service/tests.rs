//! Comment service behaviour over mocked stores.

use chrono::Utc;
use mockable::DefaultClock;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::consistency::ConsistencyOptions;
use crate::domain::credentials::{Password, PasswordHash};
use crate::domain::item::{ItemDraft, ItemId};
use crate::domain::ports::{MockCommentRepository, MockItemRepository, MockUserRepository};
use crate::domain::slug::Slug;
use crate::domain::user::{Email, Username};

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

fn sample_comment(author: &User, item: &Item, body: &str) -> Comment {
    Comment::new(CommentId::random(), body, author.id(), item.id(), Utc::now())
        .expect("comment validates")
}

struct Fixture {
    users: MockUserRepository,
    items: MockItemRepository,
    comments: MockCommentRepository,
    maintainer_items: MockItemRepository,
    maintainer_comments: MockCommentRepository,
    policy: CommentDeletePolicy,
}

impl Fixture {
    fn new() -> Self {
        Self {
            users: MockUserRepository::new(),
            items: MockItemRepository::new(),
            comments: MockCommentRepository::new(),
            maintainer_items: MockItemRepository::new(),
            maintainer_comments: MockCommentRepository::new(),
            policy: CommentDeletePolicy::default(),
        }
    }

    fn build(self) -> CommentService {
        let maintainer = Arc::new(ConsistencyMaintainer::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(self.maintainer_items),
            Arc::new(self.maintainer_comments),
            ConsistencyOptions::default(),
        ));
        CommentService::new(
            Arc::new(self.users),
            Arc::new(self.items),
            Arc::new(self.comments),
            maintainer,
            self.policy,
            Arc::new(DefaultClock),
        )
    }
}

#[tokio::test]
async fn posting_stores_the_comment_and_links_it_to_the_listing() {
    let seller = sample_user("ada");
    let author = sample_user("bob");
    let identity = Identity::new(author.id(), author.role());
    let item = sample_item(&seller, "Bike");
    let item_id = item.id();
    let slug = item.slug().to_string();

    let mut fixture = Fixture::new();
    fixture
        .items
        .expect_find_by_slug()
        .return_once(move |_| Ok(Some(item)));
    let acting = author.clone();
    fixture
        .users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(acting)));
    fixture
        .comments
        .expect_insert()
        .withf(move |comment| comment.body() == "still available?" && comment.item_id() == item_id)
        .times(1)
        .return_once(|_| Ok(()));
    fixture
        .items
        .expect_update()
        .withf(move |item| item.comments().len() == 1)
        .times(1)
        .return_once(|_| Ok(()));

    let view = fixture
        .build()
        .add_comment(identity, &slug, "still available?")
        .await
        .expect("comment posts");
    assert_eq!(view.body, "still available?");
    assert_eq!(view.author.username, "bob");
}

#[tokio::test]
async fn blank_bodies_surface_as_field_validation() {
    let seller = sample_user("ada");
    let author = sample_user("bob");
    let identity = Identity::new(author.id(), author.role());
    let item = sample_item(&seller, "Bike");
    let slug = item.slug().to_string();

    let mut fixture = Fixture::new();
    fixture
        .items
        .expect_find_by_slug()
        .return_once(move |_| Ok(Some(item)));
    let acting = author.clone();
    fixture
        .users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(acting)));
    fixture.comments.expect_insert().times(0);

    let err = fixture
        .build()
        .add_comment(identity, &slug, "   ")
        .await
        .expect_err("blank body rejected");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    let details = err.details().expect("field details present");
    assert!(details["fieldErrors"]["body"].is_string());
}

#[tokio::test]
async fn the_author_may_delete_their_own_comment() {
    let seller = sample_user("ada");
    let author = sample_user("bob");
    let identity = Identity::new(author.id(), author.role());
    let item = sample_item(&seller, "Bike");
    let item_id = item.id();
    let comment = sample_comment(&author, &item, "sold?");
    let comment_id = comment.id();
    let slug = item.slug().to_string();

    let mut fixture = Fixture::new();
    fixture
        .items
        .expect_find_by_slug()
        .return_once(move |_| Ok(Some(item.clone())));
    fixture
        .comments
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(comment)));
    fixture
        .maintainer_comments
        .expect_delete()
        .withf(move |id| *id == comment_id)
        .times(1)
        .return_once(|_| Ok(true));
    fixture
        .maintainer_items
        .expect_find_by_id()
        .return_once(move |id| {
            assert_eq!(*id, item_id);
            Ok(None)
        });

    fixture
        .build()
        .delete_comment(identity, &slug, comment_id)
        .await
        .expect("author delete succeeds");
}

#[tokio::test]
async fn bystanders_may_not_delete_under_the_default_policy() {
    let seller = sample_user("ada");
    let author = sample_user("bob");
    let bystander = sample_user("eve");
    let item = sample_item(&seller, "Bike");
    let comment = sample_comment(&author, &item, "sold?");
    let comment_id = comment.id();
    let slug = item.slug().to_string();

    let mut fixture = Fixture::new();
    fixture
        .items
        .expect_find_by_slug()
        .return_once(move |_| Ok(Some(item)));
    fixture
        .comments
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(comment)));
    fixture.maintainer_comments.expect_delete().times(0);

    let err = fixture
        .build()
        .delete_comment(
            Identity::new(bystander.id(), bystander.role()),
            &slug,
            comment_id,
        )
        .await
        .expect_err("bystander rejected");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn a_comment_addressed_through_the_wrong_listing_reads_as_absent() {
    let seller = sample_user("ada");
    let author = sample_user("bob");
    let identity = Identity::new(author.id(), author.role());
    let item = sample_item(&seller, "Bike");
    let other = sample_item(&seller, "Lamp");
    let stray = sample_comment(&author, &other, "nice lamp");
    let stray_id = stray.id();
    let slug = item.slug().to_string();

    let mut fixture = Fixture::new();
    fixture
        .items
        .expect_find_by_slug()
        .return_once(move |_| Ok(Some(item)));
    fixture
        .comments
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stray)));

    let err = fixture
        .build()
        .delete_comment(identity, &slug, stray_id)
        .await
        .expect_err("wrong listing address");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn listing_comments_projects_each_author() {
    let seller = sample_user("ada");
    let author = sample_user("bob");
    let item = sample_item(&seller, "Bike");
    let newer = sample_comment(&author, &item, "second");
    let older = sample_comment(&seller, &item, "first");
    let slug = item.slug().to_string();

    let mut fixture = Fixture::new();
    fixture
        .items
        .expect_find_by_slug()
        .return_once(move |_| Ok(Some(item)));
    fixture
        .comments
        .expect_list_for_item()
        .return_once(move |_| Ok(vec![newer, older]));
    let bob = author.clone();
    let ada = seller.clone();
    fixture.users.expect_find_by_id().returning(move |id| {
        if *id == bob.id() {
            Ok(Some(bob.clone()))
        } else {
            Ok(Some(ada.clone()))
        }
    });

    let views = fixture
        .build()
        .list_comments(&slug, None)
        .await
        .expect("comments list");
    assert_eq!(views.len(), 2);
    assert_eq!(views[0].body, "second");
    assert_eq!(views[0].author.username, "bob");
    assert_eq!(views[1].author.username, "ada");
}
