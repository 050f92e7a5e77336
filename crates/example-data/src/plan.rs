//! The generated demo plan and its record types.
//!
//! Records reference each other by index into the plan's vectors rather
//! than by identifier, because identifiers are assigned by the backend
//! when the plan is replayed.

use serde::Serialize;

/// One demo account to register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoAccount {
    /// Unique alphanumeric username.
    pub username: String,
    /// Unique email address under `example.com`.
    pub email: String,
    /// Plaintext password for the demo credential.
    pub password: String,
    /// Short profile bio.
    pub bio: String,
}

/// One demo listing to publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoListing {
    /// Index of the selling account in [`DemoPlan::accounts`].
    pub seller: usize,
    /// Listing title.
    pub title: String,
    /// One-line description.
    pub description: String,
    /// Full body text.
    pub body: String,
    /// Classification tags.
    pub tags: Vec<String>,
}

/// One demo comment to post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoComment {
    /// Index of the commenting account in [`DemoPlan::accounts`].
    pub author: usize,
    /// Index of the commented listing in [`DemoPlan::listings`].
    pub listing: usize,
    /// Comment body.
    pub body: String,
}

/// One follow edge between two accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoFollow {
    /// Index of the following account in [`DemoPlan::accounts`].
    pub follower: usize,
    /// Index of the followed account in [`DemoPlan::accounts`].
    pub followed: usize,
}

/// One favorite edge between an account and a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoFavorite {
    /// Index of the favoriting account in [`DemoPlan::accounts`].
    pub account: usize,
    /// Index of the favorited listing in [`DemoPlan::listings`].
    pub listing: usize,
}

/// A complete, replayable demo dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoPlan {
    /// Accounts to register, in order.
    pub accounts: Vec<DemoAccount>,
    /// Listings to publish after the accounts exist.
    pub listings: Vec<DemoListing>,
    /// Comments to post after the listings exist.
    pub comments: Vec<DemoComment>,
    /// Follow edges to create.
    pub follows: Vec<DemoFollow>,
    /// Favorite edges to create.
    pub favorites: Vec<DemoFavorite>,
}
