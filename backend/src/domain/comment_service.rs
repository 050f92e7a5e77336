//! Comment service: posting, listing, and policy-gated deletion.
//!
//! Comments are immutable once posted. Deletion routes through the
//! consistency maintainer so a comment row and its back-reference on the
//! listing are always removed together, even when the listing has already
//! gone.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::authorization::{CommentDeletePolicy, require_comment_delete};
use crate::domain::comment::{Comment, CommentId};
use crate::domain::consistency::{
    ConsistencyMaintainer, map_comment_error, map_item_error, map_user_error,
};
use crate::domain::error::{ACCESS_DENIED, Error};
use crate::domain::identity::Identity;
use crate::domain::item::Item;
use crate::domain::ports::{
    CommentRepository, CommentsCommand, CommentsQuery, ItemRepository, UserRepository,
};
use crate::domain::user::{User, UserId};
use crate::domain::views::CommentView;

/// Comment service implementing the comment driving ports.
pub struct CommentService {
    users: Arc<dyn UserRepository>,
    items: Arc<dyn ItemRepository>,
    comments: Arc<dyn CommentRepository>,
    maintainer: Arc<ConsistencyMaintainer>,
    policy: CommentDeletePolicy,
    clock: Arc<dyn Clock>,
}

impl CommentService {
    /// Construct the service over its collaborators.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepository>,
        items: Arc<dyn ItemRepository>,
        comments: Arc<dyn CommentRepository>,
        maintainer: Arc<ConsistencyMaintainer>,
        policy: CommentDeletePolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            items,
            comments,
            maintainer,
            policy,
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

    async fn item_by_slug(&self, slug: &str) -> Result<Item, Error> {
        self.items
            .find_by_slug(slug)
            .await
            .map_err(map_item_error)?
            .ok_or_else(|| Error::not_found("listing does not exist"))
    }

    async fn load_viewer(&self, viewer: Option<Identity>) -> Result<Option<User>, Error> {
        let Some(identity) = viewer else {
            return Ok(None);
        };
        self.users
            .find_by_id(&identity.user_id())
            .await
            .map_err(map_user_error)
    }

    /// Fetch a comment and confirm it belongs to `item`. A comment reached
    /// through the wrong listing address reads as absent.
    async fn comment_on_item(&self, item: &Item, id: CommentId) -> Result<Comment, Error> {
        let comment = self
            .comments
            .find_by_id(&id)
            .await
            .map_err(map_comment_error)?
            .filter(|comment| comment.item_id() == item.id());
        comment.ok_or_else(|| Error::not_found("comment does not exist"))
    }
}

#[async_trait]
impl CommentsCommand for CommentService {
    async fn add_comment(
        &self,
        identity: Identity,
        slug: &str,
        body: &str,
    ) -> Result<CommentView, Error> {
        let mut item = self.item_by_slug(slug).await?;
        let author = self.load_account(identity).await?;
        let comment = Comment::new(
            CommentId::random(),
            body,
            author.id(),
            item.id(),
            self.clock.utc(),
        )
        .map_err(|err| {
            Error::invalid_request("comment validation failed").with_details(serde_json::json!({
                "fieldErrors": { "body": err.to_string() }
            }))
        })?;
        self.comments
            .insert(&comment)
            .await
            .map_err(map_comment_error)?;
        if item.insert_comment(comment.id()) {
            self.items.update(&item).await.map_err(map_item_error)?;
        }
        Ok(CommentView::of(&comment, &author, Some(&author)))
    }

    async fn delete_comment(
        &self,
        identity: Identity,
        slug: &str,
        comment_id: CommentId,
    ) -> Result<(), Error> {
        let item = self.item_by_slug(slug).await?;
        let comment = self.comment_on_item(&item, comment_id).await?;
        require_comment_delete(self.policy, identity, comment.author_id(), item.seller_id())?;
        self.maintainer.detach_comment(item.id(), comment.id()).await
    }
}

#[async_trait]
impl CommentsQuery for CommentService {
    async fn list_comments(
        &self,
        slug: &str,
        viewer: Option<Identity>,
    ) -> Result<Vec<CommentView>, Error> {
        let item = self.item_by_slug(slug).await?;
        let comments = self
            .comments
            .list_for_item(&item.id())
            .await
            .map_err(map_comment_error)?;
        let viewer = self.load_viewer(viewer).await?;

        let mut authors: HashMap<UserId, User> = HashMap::new();
        let mut views = Vec::with_capacity(comments.len());
        for comment in &comments {
            if !authors.contains_key(&comment.author_id()) {
                let author = self
                    .users
                    .find_by_id(&comment.author_id())
                    .await
                    .map_err(map_user_error)?
                    .ok_or_else(|| Error::internal("comment references a missing author"))?;
                authors.insert(comment.author_id(), author);
            }
            let author = authors
                .get(&comment.author_id())
                .ok_or_else(|| Error::internal("author cache invariant broken"))?;
            views.push(CommentView::of(comment, author, viewer.as_ref()));
        }
        Ok(views)
    }
}

#[cfg(test)]
mod tests;
