//! Driving port for listing reads.

use async_trait::async_trait;
use pagination::{Page, Paginated};

use crate::domain::error::Error;
use crate::domain::identity::Identity;
use crate::domain::views::ItemView;

/// Raw query-string criteria for the public listing index.
///
/// Values arrive verbatim from the adapter: usernames resolve to accounts
/// during query execution, and criteria naming nothing (an unknown seller,
/// an unused tag) simply match no listings rather than erroring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilter {
    /// Keep listings carrying this exact tag.
    pub tag: Option<String>,
    /// Keep listings published by the account with this username.
    pub seller: Option<String>,
    /// Keep listings favorited by the account with this username.
    pub favorited_by: Option<String>,
}

/// Domain use-case port for listing reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingsQuery: Send + Sync {
    /// Project one listing by slug.
    async fn get_item(&self, slug: &str, viewer: Option<Identity>) -> Result<ItemView, Error>;

    /// Page through the public listing index, newest first.
    async fn list_items(
        &self,
        filter: &ListingFilter,
        page: &Page,
        viewer: Option<Identity>,
    ) -> Result<Paginated<ItemView>, Error>;

    /// Page through listings published by sellers the caller follows,
    /// newest first.
    async fn feed(&self, viewer: Identity, page: &Page) -> Result<Paginated<ItemView>, Error>;

    /// Every distinct tag in use, sorted.
    async fn list_tags(&self) -> Result<Vec<String>, Error>;
}
