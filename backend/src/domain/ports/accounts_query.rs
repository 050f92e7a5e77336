//! Driving port for reading the caller's own account.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::identity::Identity;
use crate::domain::views::AuthView;

/// Domain use-case port for account reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountsQuery: Send + Sync {
    /// Project the caller's own account, minting a fresh token.
    async fn current_user(&self, identity: Identity) -> Result<AuthView, Error>;
}
