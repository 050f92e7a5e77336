//! Account service behaviour over mocked stores.

use chrono::Utc;
use mockable::DefaultClock;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{CounterStoreError, MockCounterStore, MockUserRepository};
use crate::domain::user::{Email, Username};

const TEST_SECRET: &[u8] = b"account-service-test-secret";
const TEST_ROUNDS: u32 = 1_000;

fn policy() -> AccountPolicy {
    AccountPolicy {
        login_attempt_limit: 3,
        password_rounds: Some(TEST_ROUNDS),
        ..AccountPolicy::default()
    }
}

fn service(users: MockUserRepository, throttle: MockCounterStore) -> AccountService {
    AccountService::new(
        Arc::new(users),
        Arc::new(throttle),
        Arc::new(TokenSigner::with_default_ttl(TEST_SECRET)),
        Arc::new(DefaultClock),
        policy(),
    )
}

fn permissive_throttle() -> MockCounterStore {
    let mut throttle = MockCounterStore::new();
    throttle.expect_increment().returning(|_, _| Ok(1));
    throttle
}

fn stored_user(username: &str, email: &str, password: &str) -> User {
    let password = Password::new(password).expect("password");
    let hash = PasswordHash::derive_with_rounds(&password, TEST_ROUNDS).expect("hash");
    User::new(
        UserId::random(),
        Username::new(username).expect("username"),
        Email::new(email).expect("email"),
        hash,
        Utc::now(),
    )
}

fn register_request(username: &str, email: &str, password: &str) -> RegisterAccount {
    RegisterAccount {
        username: Username::new(username).expect("username"),
        email: Email::new(email).expect("email"),
        password: Password::new(password).expect("password"),
    }
}

#[tokio::test]
async fn register_persists_a_hash_and_returns_a_working_token() {
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .withf(|user| {
            user.username().as_ref() == "ada"
                && user.email().as_ref() == "ada@example.com"
                && user.password_hash().verify("correct horse")
        })
        .times(1)
        .return_once(|_| Ok(()));

    let service = service(users, permissive_throttle());
    let view = service
        .register(register_request("ada", "Ada@Example.com", "correct horse"))
        .await
        .expect("registration succeeds");

    assert_eq!(view.username, "ada");
    assert_eq!(view.email, "ada@example.com");
    assert!(!view.token.is_empty());
}

#[tokio::test]
async fn register_surfaces_duplicate_email_as_field_validation() {
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .return_once(|_| Err(crate::domain::ports::UserPersistenceError::duplicate_email()));

    let service = service(users, permissive_throttle());
    let err = service
        .register(register_request("ada", "ada@example.com", "pw"))
        .await
        .expect_err("duplicate email must fail");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    let details = err.details().expect("field details present");
    assert!(details["fieldErrors"]["email"].is_string());
}

#[tokio::test]
async fn login_accepts_the_stored_password_only() {
    let user = stored_user("ada", "ada@example.com", "correct horse");
    let mut users = MockUserRepository::new();
    let found = user.clone();
    users
        .expect_find_by_email()
        .withf(|email| email == "ada@example.com")
        .returning(move |_| Ok(Some(found.clone())));

    let service = service(users, permissive_throttle());

    let credentials =
        LoginCredentials::try_from_parts("Ada@Example.com", "correct horse").expect("creds");
    let view = service.login(&credentials).await.expect("login succeeds");
    assert_eq!(view.username, "ada");

    let wrong = LoginCredentials::try_from_parts("ada@example.com", "wrong").expect("creds");
    let err = service.login(&wrong).await.expect_err("wrong password");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), ACCESS_DENIED);
}

#[tokio::test]
async fn unknown_email_fails_exactly_like_a_wrong_password() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(|_| Ok(None));

    let service = service(users, permissive_throttle());
    let credentials = LoginCredentials::try_from_parts("ghost@example.com", "pw").expect("creds");
    let err = service.login(&credentials).await.expect_err("no account");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), ACCESS_DENIED);
}

#[tokio::test]
async fn login_is_throttled_once_the_window_budget_is_spent() {
    let users = MockUserRepository::new();
    let mut throttle = MockCounterStore::new();
    throttle
        .expect_increment()
        .withf(|key, _| key == "login:ada@example.com")
        .returning(|_, _| Ok(4));

    let service = service(users, throttle);
    let credentials = LoginCredentials::try_from_parts("ada@example.com", "pw").expect("creds");
    let err = service.login(&credentials).await.expect_err("throttled");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn a_broken_throttle_store_fails_open() {
    let user = stored_user("ada", "ada@example.com", "pw");
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(move |_| Ok(Some(user)));
    let mut throttle = MockCounterStore::new();
    throttle
        .expect_increment()
        .return_once(|_, _| Err(CounterStoreError::unavailable("down")));

    let service = service(users, throttle);
    let credentials = LoginCredentials::try_from_parts("ada@example.com", "pw").expect("creds");
    service
        .login(&credentials)
        .await
        .expect("login proceeds without the throttle");
}

#[tokio::test]
async fn issued_tokens_resolve_back_to_the_account() {
    let user = stored_user("ada", "ada@example.com", "pw");
    let user_id = user.id();
    let mut users = MockUserRepository::new();
    let found = user.clone();
    users
        .expect_find_by_email()
        .return_once(move |_| Ok(Some(found)));
    users
        .expect_find_by_id()
        .withf(move |id| *id == user_id)
        .returning(move |_| Ok(Some(user.clone())));

    let service = service(users, permissive_throttle());
    let credentials = LoginCredentials::try_from_parts("ada@example.com", "pw").expect("creds");
    let view = service.login(&credentials).await.expect("login succeeds");

    let identity = service
        .resolve_token(&view.token)
        .await
        .expect("token resolves");
    assert_eq!(identity.user_id(), user_id);
}

#[tokio::test]
async fn tokens_for_vanished_accounts_resolve_to_none() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().returning(|_| Ok(None));

    let signer = TokenSigner::with_default_ttl(TEST_SECRET);
    let token = signer
        .issue(UserId::random(), Utc::now())
        .expect("issue token");

    let service = service(users, permissive_throttle());
    assert!(service.resolve_token(token.as_str()).await.is_none());
    assert!(service.resolve_token("garbage").await.is_none());
}

#[tokio::test]
async fn profile_update_touches_only_the_supplied_fields() {
    let user = stored_user("ada", "ada@example.com", "pw");
    let identity = Identity::new(user.id(), user.role());
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(user)));
    users
        .expect_update()
        .withf(|user| {
            user.bio() == "tinkerer"
                && user.username().as_ref() == "ada"
                && user.email().as_ref() == "ada@example.com"
        })
        .times(1)
        .return_once(|_| Ok(()));

    let service = service(users, permissive_throttle());
    let view = service
        .update_profile(
            identity,
            ProfileUpdate {
                bio: Some("tinkerer".to_owned()),
                ..ProfileUpdate::default()
            },
        )
        .await
        .expect("update succeeds");
    assert_eq!(view.bio, "tinkerer");
}

#[tokio::test]
async fn an_empty_profile_update_writes_nothing() {
    let user = stored_user("ada", "ada@example.com", "pw");
    let identity = Identity::new(user.id(), user.role());
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(user)));
    users.expect_update().times(0);

    let service = service(users, permissive_throttle());
    service
        .update_profile(identity, ProfileUpdate::default())
        .await
        .expect("empty update returns the current projection");
}

#[tokio::test]
async fn current_user_rejects_a_stale_identity() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().return_once(|_| Ok(None));

    let service = service(users, permissive_throttle());
    let identity = Identity::new(UserId::random(), crate::domain::user::Role::User);
    let err = service
        .current_user(identity)
        .await
        .expect_err("vanished account");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}
