//! Driving port for account registration and profile updates.

use async_trait::async_trait;

use crate::domain::credentials::Password;
use crate::domain::error::Error;
use crate::domain::identity::Identity;
use crate::domain::user::{Email, ImageUrl, Username};
use crate::domain::views::AuthView;

/// Validated payload for creating an account.
#[derive(Debug, Clone)]
pub struct RegisterAccount {
    pub username: Username,
    pub email: Email,
    pub password: Password,
}

/// Validated partial profile update; `None` fields retain their prior
/// value.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub username: Option<Username>,
    pub email: Option<Email>,
    pub password: Option<Password>,
    pub bio: Option<String>,
    pub image: Option<ImageUrl>,
}

impl ProfileUpdate {
    /// Whether the update carries no changes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.bio.is_none()
            && self.image.is_none()
    }
}

/// Domain use-case port for account mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountsCommand: Send + Sync {
    /// Create an account and return its projection with a fresh token.
    async fn register(&self, request: RegisterAccount) -> Result<AuthView, Error>;

    /// Update the caller's own profile and return the refreshed
    /// projection.
    async fn update_profile(
        &self,
        identity: Identity,
        update: ProfileUpdate,
    ) -> Result<AuthView, Error>;
}
