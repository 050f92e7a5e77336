//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountsCommand, AccountsQuery, CommentsCommand, CommentsQuery, EngagementCommand,
    IdentityResolver, ListingsCommand, ListingsQuery, LoginService, MaintenanceCommand,
    ProfilesQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub accounts: Arc<dyn AccountsCommand>,
    pub accounts_query: Arc<dyn AccountsQuery>,
    pub profiles: Arc<dyn ProfilesQuery>,
    pub engagement: Arc<dyn EngagementCommand>,
    pub listings: Arc<dyn ListingsCommand>,
    pub listings_query: Arc<dyn ListingsQuery>,
    pub comments: Arc<dyn CommentsCommand>,
    pub comments_query: Arc<dyn CommentsQuery>,
    pub maintenance: Arc<dyn MaintenanceCommand>,
    pub identity: Arc<dyn IdentityResolver>,
}
