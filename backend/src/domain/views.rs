//! Read-side projections returned by the driving ports.
//!
//! Views are assembled inside the domain so adapters never poke at entity
//! internals. They carry plain strings and timestamps; all perspective
//! logic (`following`, `favorited`) resolves against the viewing user at
//! build time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::comment::Comment;
use crate::domain::item::Item;
use crate::domain::tokens::SignedToken;
use crate::domain::user::User;

/// Account projection returned after registration, login, and profile
/// updates. Carries a fresh bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthView {
    #[schema(example = "ada")]
    pub username: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Signed bearer token for subsequent requests.
    pub token: String,
    pub bio: String,
    pub image: Option<String>,
}

impl AuthView {
    /// Project an account together with a freshly issued token.
    #[must_use]
    pub fn of(user: &User, token: &SignedToken) -> Self {
        Self {
            username: user.username().to_string(),
            email: user.email().to_string(),
            token: token.as_str().to_owned(),
            bio: user.bio().to_owned(),
            image: user.image().map(ToString::to_string),
        }
    }
}

/// Public profile projection as seen by an optional viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    #[schema(example = "ada")]
    pub username: String,
    pub bio: String,
    pub image: Option<String>,
    /// Whether the viewing user follows this profile. Always `false` for
    /// anonymous viewers.
    pub following: bool,
}

impl ProfileView {
    /// Project a profile from the perspective of `viewer`.
    #[must_use]
    pub fn of(user: &User, viewer: Option<&User>) -> Self {
        Self {
            username: user.username().to_string(),
            bio: user.bio().to_owned(),
            image: user.image().map(ToString::to_string),
            following: viewer.is_some_and(|v| v.is_following(user.id())),
        }
    }
}

/// Listing projection as seen by an optional viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    #[schema(example = "vintage-camera-a1b2c3")]
    pub slug: String,
    #[schema(example = "Vintage Camera")]
    pub title: String,
    pub description: String,
    pub body: String,
    pub tag_list: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Whether the viewing user has favorited this listing. Always `false`
    /// for anonymous viewers.
    pub favorited: bool,
    /// Denormalized favorite tally.
    pub favorites_count: u64,
    pub seller: ProfileView,
}

impl ItemView {
    /// Project a listing and its seller from the perspective of `viewer`.
    #[must_use]
    pub fn of(item: &Item, seller: &User, viewer: Option<&User>) -> Self {
        Self {
            slug: item.slug().to_string(),
            title: item.title().to_owned(),
            description: item.description().to_owned(),
            body: item.body().to_owned(),
            tag_list: item.tags().iter().map(ToString::to_string).collect(),
            created_at: item.created_at(),
            updated_at: item.updated_at(),
            favorited: viewer.is_some_and(|v| v.has_favorited(item.id())),
            favorites_count: item.favorites_count(),
            seller: ProfileView::of(seller, viewer),
        }
    }
}

/// Comment projection as seen by an optional viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub body: String,
    pub author: ProfileView,
}

impl CommentView {
    /// Project a comment and its author from the perspective of `viewer`.
    #[must_use]
    pub fn of(comment: &Comment, author: &User, viewer: Option<&User>) -> Self {
        Self {
            id: *comment.id().as_uuid(),
            created_at: comment.created_at(),
            body: comment.body().to_owned(),
            author: ProfileView::of(author, viewer),
        }
    }
}
