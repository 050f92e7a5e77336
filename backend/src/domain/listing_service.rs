//! Listing service: publication, edits, deletion, and the public listing
//! index.
//!
//! The slug is assigned exactly once at publication, derived from the
//! title plus a random suffix; later title edits never move the listing's
//! address. Deletion hands off to the consistency maintainer so the
//! comment cascade has one owner.

use std::collections::HashMap;

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, Paginated};

use crate::domain::authorization::require_seller;
use crate::domain::consistency::{ConsistencyMaintainer, map_item_error, map_user_error};
use crate::domain::error::{ACCESS_DENIED, Error};
use crate::domain::identity::Identity;
use crate::domain::item::{Item, ItemDraft, ItemId, ItemUpdate};
use crate::domain::ports::{
    ItemFilter, ItemPersistenceError, ItemRepository, ListingFilter, ListingsCommand,
    ListingsQuery, UserRepository,
};
use crate::domain::slug::Slug;
use crate::domain::user::{User, UserId};
use crate::domain::views::ItemView;

/// How many times publication retries slug generation on a collision.
/// The random suffix makes collisions vanishingly rare; this bound only
/// keeps a pathological store from looping forever.
const SLUG_ATTEMPTS: u32 = 3;

/// Listing service implementing the listing driving ports.
pub struct ListingService {
    users: Arc<dyn UserRepository>,
    items: Arc<dyn ItemRepository>,
    maintainer: Arc<ConsistencyMaintainer>,
    clock: Arc<dyn Clock>,
}

impl ListingService {
    /// Construct the service over its collaborators.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepository>,
        items: Arc<dyn ItemRepository>,
        maintainer: Arc<ConsistencyMaintainer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            items,
            maintainer,
            clock,
        }
    }

    async fn load_account(&self, identity: Identity) -> Result<User, Error> {
        self.users
            .find_by_id(&identity.user_id())
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized(ACCESS_DENIED))
    }

    /// Resolve an optional viewer to their account; a stale identity reads
    /// as anonymous rather than failing the whole request.
    async fn load_viewer(&self, viewer: Option<Identity>) -> Result<Option<User>, Error> {
        let Some(identity) = viewer else {
            return Ok(None);
        };
        self.users
            .find_by_id(&identity.user_id())
            .await
            .map_err(map_user_error)
    }

    async fn load_seller(&self, seller_id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(&seller_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::internal("listing references a missing seller"))
    }

    async fn item_by_slug(&self, slug: &str) -> Result<Item, Error> {
        self.items
            .find_by_slug(slug)
            .await
            .map_err(map_item_error)?
            .ok_or_else(|| Error::not_found("listing does not exist"))
    }

    /// Project a page of listings, loading each distinct seller once.
    async fn project_page(
        &self,
        page: Paginated<Item>,
        viewer: Option<&User>,
    ) -> Result<Paginated<ItemView>, Error> {
        let mut sellers: HashMap<UserId, User> = HashMap::new();
        let mut views = Vec::with_capacity(page.items.len());
        for item in &page.items {
            if !sellers.contains_key(&item.seller_id()) {
                let seller = self.load_seller(item.seller_id()).await?;
                sellers.insert(item.seller_id(), seller);
            }
            let seller = sellers
                .get(&item.seller_id())
                .ok_or_else(|| Error::internal("seller cache invariant broken"))?;
            views.push(ItemView::of(item, seller, viewer));
        }
        Ok(Paginated::new(views, page.total))
    }

    /// Translate raw index criteria into repository criteria.
    ///
    /// Criteria naming an unknown account match nothing; `Ok(None)` means
    /// the result is empty without consulting the listing store.
    async fn resolve_filter(&self, filter: &ListingFilter) -> Result<Option<ItemFilter>, Error> {
        let mut resolved = ItemFilter {
            tag: filter.tag.clone(),
            ..ItemFilter::default()
        };
        if let Some(name) = &filter.seller {
            match self
                .users
                .find_by_username(name)
                .await
                .map_err(map_user_error)?
            {
                Some(seller) => resolved.seller = Some(seller.id()),
                None => return Ok(None),
            }
        }
        if let Some(name) = &filter.favorited_by {
            match self
                .users
                .find_by_username(name)
                .await
                .map_err(map_user_error)?
            {
                Some(fan) => resolved.ids = Some(fan.favorites().clone()),
                None => return Ok(None),
            }
        }
        Ok(Some(resolved))
    }
}

#[async_trait]
impl ListingsCommand for ListingService {
    async fn create_item(&self, identity: Identity, draft: ItemDraft) -> Result<ItemView, Error> {
        let seller = self.load_account(identity).await?;
        let published_at = self.clock.utc();

        let mut attempt = 1;
        loop {
            let slug = Slug::generate(draft.title(), &mut rand::thread_rng());
            let item = Item::create(
                ItemId::random(),
                slug,
                draft.clone(),
                seller.id(),
                published_at,
            );
            match self.items.insert(&item).await {
                Ok(()) => return Ok(ItemView::of(&item, &seller, Some(&seller))),
                Err(ItemPersistenceError::DuplicateSlug { .. }) if attempt < SLUG_ATTEMPTS => {
                    attempt += 1;
                }
                Err(err) => return Err(map_item_error(err)),
            }
        }
    }

    async fn update_item(
        &self,
        identity: Identity,
        slug: &str,
        update: ItemUpdate,
    ) -> Result<ItemView, Error> {
        let mut item = self.item_by_slug(slug).await?;
        require_seller(identity, item.seller_id())?;
        let seller = self.load_seller(item.seller_id()).await?;
        if update.is_empty() {
            return Ok(ItemView::of(&item, &seller, Some(&seller)));
        }
        item.apply(update, self.clock.utc());
        self.items.update(&item).await.map_err(map_item_error)?;
        Ok(ItemView::of(&item, &seller, Some(&seller)))
    }

    async fn delete_item(&self, identity: Identity, slug: &str) -> Result<(), Error> {
        let item = self.item_by_slug(slug).await?;
        require_seller(identity, item.seller_id())?;
        self.maintainer.cascade_delete_item(item.id()).await
    }
}

#[async_trait]
impl ListingsQuery for ListingService {
    async fn get_item(&self, slug: &str, viewer: Option<Identity>) -> Result<ItemView, Error> {
        let item = self.item_by_slug(slug).await?;
        let seller = self.load_seller(item.seller_id()).await?;
        let viewer = self.load_viewer(viewer).await?;
        Ok(ItemView::of(&item, &seller, viewer.as_ref()))
    }

    async fn list_items(
        &self,
        filter: &ListingFilter,
        page: &Page,
        viewer: Option<Identity>,
    ) -> Result<Paginated<ItemView>, Error> {
        let Some(resolved) = self.resolve_filter(filter).await? else {
            return Ok(Paginated::new(Vec::new(), 0));
        };
        let items = self
            .items
            .list(&resolved, page)
            .await
            .map_err(map_item_error)?;
        let viewer = self.load_viewer(viewer).await?;
        self.project_page(items, viewer.as_ref()).await
    }

    async fn feed(&self, viewer: Identity, page: &Page) -> Result<Paginated<ItemView>, Error> {
        let account = self.load_account(viewer).await?;
        if account.following().is_empty() {
            return Ok(Paginated::new(Vec::new(), 0));
        }
        let filter = ItemFilter {
            sellers: Some(account.following().clone()),
            ..ItemFilter::default()
        };
        let items = self
            .items
            .list(&filter, page)
            .await
            .map_err(map_item_error)?;
        self.project_page(items, Some(&account)).await
    }

    async fn list_tags(&self) -> Result<Vec<String>, Error> {
        self.items.distinct_tags().await.map_err(map_item_error)
    }
}
