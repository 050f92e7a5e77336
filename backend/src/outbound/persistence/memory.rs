//! Shared in-process store backing the three repository ports.
//!
//! One [`MemoryStore`] holds users, listings, and comments behind one
//! `RwLock` per collection. Uniqueness constraints (case-insensitive
//! username, lowercased email, slug) are enforced here, exactly where a
//! database would enforce them, so the domain services see the same
//! `Duplicate*` errors regardless of the backing store.
//!
//! Each lock is held only for the duration of one synchronous map
//! operation; the ports never await while holding a lock.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use pagination::{Page, Paginated};
use tokio::sync::RwLock;

use crate::domain::comment::{Comment, CommentId};
use crate::domain::item::{Item, ItemId};
use crate::domain::ports::{
    CommentPersistenceError, CommentRepository, ItemFilter, ItemPersistenceError, ItemRepository,
    UserPersistenceError, UserRepository,
};
use crate::domain::user::{User, UserId};

/// In-memory marketplace store implementing all three repository ports.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<UserId, User>>,
    items: RwLock<HashMap<ItemId, Item>>,
    comments: RwLock<HashMap<CommentId, Comment>>,
}

impl MemoryStore {
    /// Construct an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the user uniqueness constraints against every record except
    /// `candidate` itself.
    fn check_user_uniqueness(
        records: &HashMap<UserId, User>,
        candidate: &User,
    ) -> Result<(), UserPersistenceError> {
        for existing in records.values() {
            if existing.id() == candidate.id() {
                continue;
            }
            if existing
                .username()
                .as_ref()
                .eq_ignore_ascii_case(candidate.username().as_ref())
            {
                return Err(UserPersistenceError::duplicate_username());
            }
            if existing.email().as_ref() == candidate.email().as_ref() {
                return Err(UserPersistenceError::duplicate_email());
            }
        }
        Ok(())
    }

    fn matches(item: &Item, filter: &ItemFilter) -> bool {
        if let Some(tag) = &filter.tag {
            if !item.tags().iter().any(|t| t.as_ref() == tag.as_str()) {
                return false;
            }
        }
        if let Some(seller) = &filter.seller {
            if item.seller_id() != *seller {
                return false;
            }
        }
        if let Some(sellers) = &filter.sellers {
            if !sellers.contains(&item.seller_id()) {
                return false;
            }
        }
        if let Some(ids) = &filter.ids {
            if !ids.contains(&item.id()) {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.users.write().await;
        Self::check_user_uniqueness(&users, user)?;
        users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id()) {
            return Err(UserPersistenceError::missing());
        }
        Self::check_user_uniqueness(&users, user)?;
        users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|user| user.username().as_ref().eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|user| user.email().as_ref() == email)
            .cloned())
    }

    async fn count_favoriting(&self, item_id: &ItemId) -> Result<u64, UserPersistenceError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .filter(|user| user.has_favorited(*item_id))
            .count() as u64)
    }

    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self.users.read().await.values().cloned().collect())
    }
}

#[async_trait]
impl ItemRepository for MemoryStore {
    async fn insert(&self, item: &Item) -> Result<(), ItemPersistenceError> {
        let mut items = self.items.write().await;
        if items
            .values()
            .any(|existing| existing.slug() == item.slug())
        {
            return Err(ItemPersistenceError::duplicate_slug(item.slug().to_string()));
        }
        items.insert(item.id(), item.clone());
        Ok(())
    }

    async fn update(&self, item: &Item) -> Result<(), ItemPersistenceError> {
        let mut items = self.items.write().await;
        if !items.contains_key(&item.id()) {
            return Err(ItemPersistenceError::missing());
        }
        if items
            .values()
            .any(|existing| existing.id() != item.id() && existing.slug() == item.slug())
        {
            return Err(ItemPersistenceError::duplicate_slug(item.slug().to_string()));
        }
        items.insert(item.id(), item.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ItemId) -> Result<Option<Item>, ItemPersistenceError> {
        Ok(self.items.read().await.get(id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Item>, ItemPersistenceError> {
        let items = self.items.read().await;
        Ok(items
            .values()
            .find(|item| item.slug().as_ref() == slug)
            .cloned())
    }

    async fn delete(&self, id: &ItemId) -> Result<bool, ItemPersistenceError> {
        Ok(self.items.write().await.remove(id).is_some())
    }

    async fn list(
        &self,
        filter: &ItemFilter,
        page: &Page,
    ) -> Result<Paginated<Item>, ItemPersistenceError> {
        let items = self.items.read().await;
        let mut matched: Vec<&Item> = items
            .values()
            .filter(|item| Self::matches(item, filter))
            .collect();
        // Newest first, with the id as a deterministic tie-break.
        matched.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(&a.id()))
        });
        let total = matched.len() as u64;
        let window = matched
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(page.limit() as usize)
            .cloned()
            .collect();
        Ok(Paginated::new(window, total))
    }

    async fn distinct_tags(&self) -> Result<Vec<String>, ItemPersistenceError> {
        let items = self.items.read().await;
        let tags: BTreeSet<String> = items
            .values()
            .flat_map(|item| item.tags().iter().map(ToString::to_string))
            .collect();
        Ok(tags.into_iter().collect())
    }

    async fn set_favorites_count(
        &self,
        id: &ItemId,
        count: u64,
    ) -> Result<bool, ItemPersistenceError> {
        let mut items = self.items.write().await;
        match items.get_mut(id) {
            Some(item) => {
                item.set_favorites_count(count);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_ids(&self) -> Result<BTreeSet<ItemId>, ItemPersistenceError> {
        Ok(self.items.read().await.keys().copied().collect())
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn insert(&self, comment: &Comment) -> Result<(), CommentPersistenceError> {
        self.comments
            .write()
            .await
            .insert(comment.id(), comment.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &CommentId,
    ) -> Result<Option<Comment>, CommentPersistenceError> {
        Ok(self.comments.read().await.get(id).cloned())
    }

    async fn delete(&self, id: &CommentId) -> Result<bool, CommentPersistenceError> {
        Ok(self.comments.write().await.remove(id).is_some())
    }

    async fn list_for_item(
        &self,
        item_id: &ItemId,
    ) -> Result<Vec<Comment>, CommentPersistenceError> {
        let comments = self.comments.read().await;
        let mut matched: Vec<Comment> = comments
            .values()
            .filter(|comment| comment.item_id() == *item_id)
            .cloned()
            .collect();
        matched.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(&a.id()))
        });
        Ok(matched)
    }

    async fn delete_for_item(&self, item_id: &ItemId) -> Result<u64, CommentPersistenceError> {
        let mut comments = self.comments.write().await;
        let before = comments.len();
        comments.retain(|_, comment| comment.item_id() != *item_id);
        Ok((before - comments.len()) as u64)
    }
}
