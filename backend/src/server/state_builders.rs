//! Builders wiring the in-memory stores into the domain services.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use backend::domain::ports::{CommentRepository, CounterStore, ItemRepository, UserRepository};
use backend::domain::{
    AccountService, CommentService, ConsistencyMaintainer, ListingService, MaintenanceService,
    RelationshipService, TokenSigner,
};
use backend::inbound::http::state::HttpState;
use backend::outbound::persistence::MemoryStore;
use backend::outbound::throttle::InMemoryCounterStore;

use super::ServerConfig;

/// Wire the domain services over one shared in-memory store.
#[must_use]
pub fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let store = Arc::new(MemoryStore::default());
    let users: Arc<dyn UserRepository> = store.clone();
    let items: Arc<dyn ItemRepository> = store.clone();
    let comments: Arc<dyn CommentRepository> = store;

    let throttle: Arc<dyn CounterStore> = Arc::new(InMemoryCounterStore::new());
    let signer = Arc::new(TokenSigner::new(&config.token_secret, config.token_ttl));
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let maintainer = Arc::new(ConsistencyMaintainer::new(
        users.clone(),
        items.clone(),
        comments.clone(),
        config.consistency.clone(),
    ));

    let accounts = Arc::new(AccountService::new(
        users.clone(),
        throttle,
        signer,
        clock.clone(),
        config.account_policy.clone(),
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
        config.comment_policy,
        clock,
    ));
    let maintenance = Arc::new(MaintenanceService::new(maintainer));

    web::Data::new(HttpState {
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
    })
}
