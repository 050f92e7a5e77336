//! Shared helpers for HTTP handler tests.

use std::sync::Arc;

use crate::domain::ports::{
    MockAccountsCommand, MockAccountsQuery, MockCommentsCommand, MockCommentsQuery,
    MockEngagementCommand, MockIdentityResolver, MockListingsCommand, MockListingsQuery,
    MockLoginService, MockMaintenanceCommand, MockProfilesQuery,
};
use crate::inbound::http::state::HttpState;

/// Mutable bundle of mocked driving ports.
///
/// Tests set expectations on the mocks they exercise and leave the rest
/// untouched; an unexpected call on an untouched mock panics, which is
/// exactly the regression signal wanted.
pub struct StateFixture {
    pub login: MockLoginService,
    pub accounts: MockAccountsCommand,
    pub accounts_query: MockAccountsQuery,
    pub profiles: MockProfilesQuery,
    pub engagement: MockEngagementCommand,
    pub listings: MockListingsCommand,
    pub listings_query: MockListingsQuery,
    pub comments: MockCommentsCommand,
    pub comments_query: MockCommentsQuery,
    pub maintenance: MockMaintenanceCommand,
    pub identity: MockIdentityResolver,
}

impl Default for StateFixture {
    fn default() -> Self {
        Self {
            login: MockLoginService::new(),
            accounts: MockAccountsCommand::new(),
            accounts_query: MockAccountsQuery::new(),
            profiles: MockProfilesQuery::new(),
            engagement: MockEngagementCommand::new(),
            listings: MockListingsCommand::new(),
            listings_query: MockListingsQuery::new(),
            comments: MockCommentsCommand::new(),
            comments_query: MockCommentsQuery::new(),
            maintenance: MockMaintenanceCommand::new(),
            identity: MockIdentityResolver::new(),
        }
    }
}

impl StateFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wire the resolver to hand back `identity` for any presented token.
    pub fn allow_identity(&mut self, identity: crate::domain::Identity) {
        self.identity
            .expect_resolve_token()
            .returning(move |_| Some(identity));
    }

    pub fn build(self) -> HttpState {
        HttpState {
            login: Arc::new(self.login),
            accounts: Arc::new(self.accounts),
            accounts_query: Arc::new(self.accounts_query),
            profiles: Arc::new(self.profiles),
            engagement: Arc::new(self.engagement),
            listings: Arc::new(self.listings),
            listings_query: Arc::new(self.listings_query),
            comments: Arc::new(self.comments),
            comments_query: Arc::new(self.comments_query),
            maintenance: Arc::new(self.maintenance),
            identity: Arc::new(self.identity),
        }
    }
}
