//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod accounts_command;
mod accounts_query;
mod comment_repository;
mod comments_command;
mod comments_query;
mod counter_store;
mod engagement_command;
mod identity_resolver;
mod item_repository;
mod listings_command;
mod listings_query;
mod login_service;
mod maintenance_command;
mod profiles_query;
mod user_repository;

#[cfg(test)]
pub use accounts_command::MockAccountsCommand;
pub use accounts_command::{AccountsCommand, ProfileUpdate, RegisterAccount};
#[cfg(test)]
pub use accounts_query::MockAccountsQuery;
pub use accounts_query::AccountsQuery;
#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comment_repository::{CommentPersistenceError, CommentRepository};
#[cfg(test)]
pub use comments_command::MockCommentsCommand;
pub use comments_command::CommentsCommand;
#[cfg(test)]
pub use comments_query::MockCommentsQuery;
pub use comments_query::CommentsQuery;
#[cfg(test)]
pub use counter_store::MockCounterStore;
pub use counter_store::{CounterStore, CounterStoreError};
#[cfg(test)]
pub use engagement_command::MockEngagementCommand;
pub use engagement_command::EngagementCommand;
#[cfg(test)]
pub use identity_resolver::MockIdentityResolver;
pub use identity_resolver::IdentityResolver;
#[cfg(test)]
pub use item_repository::MockItemRepository;
pub use item_repository::{ItemFilter, ItemPersistenceError, ItemRepository};
#[cfg(test)]
pub use listings_command::MockListingsCommand;
pub use listings_command::ListingsCommand;
#[cfg(test)]
pub use listings_query::MockListingsQuery;
pub use listings_query::{ListingFilter, ListingsQuery};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use maintenance_command::MockMaintenanceCommand;
pub use maintenance_command::MaintenanceCommand;
#[cfg(test)]
pub use profiles_query::MockProfilesQuery;
pub use profiles_query::ProfilesQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
