//! Driving port for public profile reads.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::identity::Identity;
use crate::domain::views::ProfileView;

/// Domain use-case port for profile reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfilesQuery: Send + Sync {
    /// Project the profile addressed by `username` from the perspective of
    /// an optional viewer.
    async fn fetch_profile(
        &self,
        username: &str,
        viewer: Option<Identity>,
    ) -> Result<ProfileView, Error>;
}
