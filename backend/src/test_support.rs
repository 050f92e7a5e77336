//! Test utilities for the backend crate.
//!
//! Provides the full service stack wired over the in-memory store so
//! integration tests exercise real services rather than mocks. Password
//! hashing runs with a deliberately low round count to keep suites fast.

use std::sync::Arc;
use std::time::Duration;

use mockable::{Clock, DefaultClock};

use crate::domain::account_service::AccountPolicy;
use crate::domain::authorization::CommentDeletePolicy;
use crate::domain::consistency::ConsistencyOptions;
use crate::domain::ports::{CommentRepository, CounterStore, ItemRepository, UserRepository};
use crate::domain::{
    AccountService, CommentService, ConsistencyMaintainer, ListingService, MaintenanceService,
    RelationshipService, TokenSigner,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::MemoryStore;
use crate::outbound::throttle::InMemoryCounterStore;

/// PBKDF2 rounds used by test stacks. Far below production strength.
pub const TEST_PASSWORD_ROUNDS: u32 = 10;

/// A fully wired service stack over one shared in-memory store.
pub struct TestStack {
    /// The driving ports, as handed to the HTTP adapter.
    pub state: HttpState,
    /// Direct access to the backing store for assertions.
    pub store: Arc<MemoryStore>,
}

/// Build a stack with the default comment-delete policy.
#[must_use]
pub fn test_stack() -> TestStack {
    test_stack_with_policy(CommentDeletePolicy::default())
}

/// Build a stack with an explicit comment-delete policy.
#[must_use]
pub fn test_stack_with_policy(policy: CommentDeletePolicy) -> TestStack {
    let store = Arc::new(MemoryStore::default());
    let users: Arc<dyn UserRepository> = store.clone();
    let items: Arc<dyn ItemRepository> = store.clone();
    let comments: Arc<dyn CommentRepository> = store.clone();

    let throttle: Arc<dyn CounterStore> = Arc::new(InMemoryCounterStore::new());
    let signer = Arc::new(TokenSigner::with_default_ttl(b"test-suite-secret"));
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let maintainer = Arc::new(ConsistencyMaintainer::new(
        users.clone(),
        items.clone(),
        comments.clone(),
        ConsistencyOptions {
            base_backoff: Duration::from_millis(1),
            ..ConsistencyOptions::default()
        },
    ));

    let accounts = Arc::new(AccountService::new(
        users.clone(),
        throttle,
        signer,
        clock.clone(),
        AccountPolicy {
            password_rounds: Some(TEST_PASSWORD_ROUNDS),
            ..AccountPolicy::default()
        },
    ));
    let listings = Arc::new(ListingService::new(
        users.clone(),
        items.clone(),
        maintainer.clone(),
        clock.clone(),
    ));
    let relationships = Arc::new(RelationshipService::new(
        users.clone(),
        items.clone(),
        maintainer.clone(),
    ));
    let comment_service = Arc::new(CommentService::new(
        users,
        items,
        comments,
        maintainer.clone(),
        policy,
        clock,
    ));
    let maintenance = Arc::new(MaintenanceService::new(maintainer));

    let state = HttpState {
        login: accounts.clone(),
        accounts: accounts.clone(),
        accounts_query: accounts.clone(),
        identity: accounts,
        profiles: relationships.clone(),
        engagement: relationships,
        listings: listings.clone(),
        listings_query: listings,
        comments: comment_service.clone(),
        comments_query: comment_service,
        maintenance,
    };

    TestStack { state, store }
}
