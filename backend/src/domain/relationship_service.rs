//! Relationship service: favorite and follow edges plus profile reads.
//!
//! All four toggles are set-membership operations, never counters: a
//! repeated favorite or follow is a no-op that skips the store write
//! entirely. A favorite toggle hands the affected listing to the
//! consistency maintainer, which recomputes the denormalized tally from
//! the user sets. The toggle and the tally are two separate writes; see
//! the maintainer's module docs for the consistency window this opens.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::consistency::{ConsistencyMaintainer, map_item_error, map_user_error};
use crate::domain::error::{ACCESS_DENIED, Error};
use crate::domain::identity::Identity;
use crate::domain::item::Item;
use crate::domain::ports::{
    EngagementCommand, ItemRepository, ProfilesQuery, UserRepository,
};
use crate::domain::user::User;
use crate::domain::views::{ItemView, ProfileView};

/// Relationship service implementing the engagement and profile ports.
pub struct RelationshipService {
    users: Arc<dyn UserRepository>,
    items: Arc<dyn ItemRepository>,
    maintainer: Arc<ConsistencyMaintainer>,
}

impl RelationshipService {
    /// Construct the service over its collaborators.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepository>,
        items: Arc<dyn ItemRepository>,
        maintainer: Arc<ConsistencyMaintainer>,
    ) -> Self {
        Self {
            users,
            items,
            maintainer,
        }
    }

    async fn load_account(&self, identity: Identity) -> Result<User, Error> {
        self.users
            .find_by_id(&identity.user_id())
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized(ACCESS_DENIED))
    }

    async fn item_by_slug(&self, slug: &str) -> Result<Item, Error> {
        self.items
            .find_by_slug(slug)
            .await
            .map_err(map_item_error)?
            .ok_or_else(|| Error::not_found("listing does not exist"))
    }

    async fn user_by_username(&self, username: &str) -> Result<User, Error> {
        self.users
            .find_by_username(username)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("profile does not exist"))
    }

    /// Apply a favorite-set change and refresh the listing's tally.
    ///
    /// `mutate` returns whether the set changed; unchanged sets skip both
    /// the account write and the recomputation.
    async fn toggle_favorite(
        &self,
        identity: Identity,
        slug: &str,
        mutate: impl FnOnce(&mut User, &Item) -> bool + Send,
    ) -> Result<ItemView, Error> {
        let item = self.item_by_slug(slug).await?;
        let mut account = self.load_account(identity).await?;
        if mutate(&mut account, &item) {
            self.users.update(&account).await.map_err(map_user_error)?;
            self.maintainer.recompute_favorites_count(item.id()).await?;
        }
        // Re-read so the projection carries the freshly recomputed tally.
        let item = self.item_by_slug(slug).await?;
        let seller = self
            .users
            .find_by_id(&item.seller_id())
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::internal("listing references a missing seller"))?;
        Ok(ItemView::of(&item, &seller, Some(&account)))
    }

    /// Apply a follow-set change on the acting account.
    async fn toggle_follow(
        &self,
        identity: Identity,
        username: &str,
        mutate: impl FnOnce(&mut User, &User) -> bool + Send,
    ) -> Result<ProfileView, Error> {
        let target = self.user_by_username(username).await?;
        if target.id() == identity.user_id() {
            return Err(
                Error::invalid_request("cannot follow yourself").with_details(serde_json::json!({
                    "fieldErrors": { "username": "must name another account" }
                })),
            );
        }
        let mut account = self.load_account(identity).await?;
        if mutate(&mut account, &target) {
            self.users.update(&account).await.map_err(map_user_error)?;
        }
        Ok(ProfileView::of(&target, Some(&account)))
    }
}

#[async_trait]
impl EngagementCommand for RelationshipService {
    async fn favorite(&self, identity: Identity, slug: &str) -> Result<ItemView, Error> {
        self.toggle_favorite(identity, slug, |account, item| {
            account.insert_favorite(item.id())
        })
        .await
    }

    async fn unfavorite(&self, identity: Identity, slug: &str) -> Result<ItemView, Error> {
        self.toggle_favorite(identity, slug, |account, item| {
            account.remove_favorite(item.id())
        })
        .await
    }

    async fn follow(&self, identity: Identity, username: &str) -> Result<ProfileView, Error> {
        self.toggle_follow(identity, username, |account, target| {
            account.insert_following(target.id())
        })
        .await
    }

    async fn unfollow(&self, identity: Identity, username: &str) -> Result<ProfileView, Error> {
        self.toggle_follow(identity, username, |account, target| {
            account.remove_following(target.id())
        })
        .await
    }
}

#[async_trait]
impl ProfilesQuery for RelationshipService {
    async fn fetch_profile(
        &self,
        username: &str,
        viewer: Option<Identity>,
    ) -> Result<ProfileView, Error> {
        let target = self.user_by_username(username).await?;
        let viewer = match viewer {
            Some(identity) => self
                .users
                .find_by_id(&identity.user_id())
                .await
                .map_err(map_user_error)?,
            None => None,
        };
        Ok(ProfileView::of(&target, viewer.as_ref()))
    }
}

#[cfg(test)]
mod tests;
