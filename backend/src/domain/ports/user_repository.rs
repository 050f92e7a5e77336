//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::item::ItemId;
use crate::domain::user::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Store is temporarily unreachable; the operation may be retried.
        Unavailable { message: String } => "user store unavailable: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user store query failed: {message}",
        /// Another account already holds this username (case-insensitive).
        DuplicateUsername => "username is already taken",
        /// Another account is already registered with this email.
        DuplicateEmail => "email is already registered",
        /// No record exists for the targeted user.
        Missing => "user record does not exist",
    }
}

/// Port for user storage and retrieval.
///
/// Adapters enforce the two uniqueness constraints themselves: username
/// (compared case-insensitively) and email (stored lowercased). Both
/// `insert` and `update` surface violations as the `Duplicate*` variants.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a brand-new user record.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Replace the stored record for an existing user.
    async fn update(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by username, compared case-insensitively.
    async fn find_by_username(&self, username: &str)
        -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by email. Callers pass the lowercased form.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError>;

    /// Count how many users currently hold `item_id` in their favorites.
    ///
    /// This is the source of truth the denormalized favorite tally is
    /// recomputed from.
    async fn count_favoriting(&self, item_id: &ItemId) -> Result<u64, UserPersistenceError>;

    /// Fetch every stored user. Used by the favorites compaction sweep.
    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError>;
}
