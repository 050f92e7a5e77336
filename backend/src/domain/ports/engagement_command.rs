//! Driving port for favorites and follows.
//!
//! All four operations are idempotent: repeating one is a no-op that still
//! returns the current projection.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::identity::Identity;
use crate::domain::views::{ItemView, ProfileView};

/// Domain use-case port for the caller's own engagement edges.
///
/// Callers can only mutate their own favorite and follow sets; the acting
/// account is always the authenticated identity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EngagementCommand: Send + Sync {
    /// Add the listing addressed by `slug` to the caller's favorites.
    async fn favorite(&self, identity: Identity, slug: &str) -> Result<ItemView, Error>;

    /// Remove the listing addressed by `slug` from the caller's favorites.
    async fn unfavorite(&self, identity: Identity, slug: &str) -> Result<ItemView, Error>;

    /// Follow the account addressed by `username`.
    async fn follow(&self, identity: Identity, username: &str) -> Result<ProfileView, Error>;

    /// Unfollow the account addressed by `username`.
    async fn unfollow(&self, identity: Identity, username: &str) -> Result<ProfileView, Error>;
}
