//! User data model.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::domain::credentials::PasswordHash;
use crate::domain::item::ItemId;

/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 40;
/// Maximum allowed length for an email address.
pub const EMAIL_MAX: usize = 254;

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    EmptyUsername,
    UsernameTooLong { max: usize },
    UsernameInvalidCharacters,
    InvalidEmail,
    InvalidImageUrl,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::UsernameInvalidCharacters => {
                write!(f, "username may only contain ASCII letters or digits")
            }
            Self::InvalidEmail => write!(f, "email address is not plausible"),
            Self::InvalidImageUrl => write!(f, "image must be a valid http or https URL"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
///
/// Identifiers are ordered and hashable so they can key follow and
/// favorite sets directly.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        let parsed = Uuid::parse_str(raw).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed))
    }

    /// Generate a new random [`UserId`].
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Public handle other users see and address profiles by.
///
/// Usernames preserve the case they were registered with; uniqueness is
/// enforced case-insensitively via [`Username::normalized`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`] from owned input.
    pub fn new(username: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(username.into())
    }

    fn from_owned(username: String) -> Result<Self, UserValidationError> {
        if username.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if username.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        if !username.chars().all(|ch| ch.is_ascii_alphanumeric()) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(username))
    }

    /// Lowercased form used as the case-insensitive uniqueness key.
    #[must_use]
    pub fn normalized(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Login identifier, stored lowercased so lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`] from owned input.
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(email.into())
    }

    fn from_owned(email: String) -> Result<Self, UserValidationError> {
        if !is_plausible_email(&email) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(email.to_ascii_lowercase()))
    }
}

fn is_plausible_email(value: &str) -> bool {
    if value.is_empty() || value.len() > EMAIL_MAX {
        return false;
    }
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = value.splitn(2, '@');
    match (parts.next(), parts.next()) {
        (Some(local), Some(domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        }
        _ => false,
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Avatar address validated as an absolute http(s) URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageUrl(String);

impl ImageUrl {
    /// Validate and construct an [`ImageUrl`] from owned input.
    pub fn new(url: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(url.into())
    }

    fn from_owned(url: String) -> Result<Self, UserValidationError> {
        let parsed = Url::parse(&url).map_err(|_| UserValidationError::InvalidImageUrl)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(UserValidationError::InvalidImageUrl);
        }
        Ok(Self(url))
    }
}

impl AsRef<str> for ImageUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ImageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<ImageUrl> for String {
    fn from(value: ImageUrl) -> Self {
        value.0
    }
}

impl TryFrom<String> for ImageUrl {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Coarse capability level attached to every account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Ordinary marketplace participant.
    #[default]
    User,
    /// Operator allowed to run maintenance operations.
    Admin,
}

impl Role {
    /// Whether this role grants operator capabilities.
    #[must_use]
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// Marketplace account.
///
/// ## Invariants
/// - `username` is unique case-insensitively across all users.
/// - `email` is unique and stored lowercased.
/// - `favorites` and `following` never contain duplicates; `following`
///   never contains the user's own id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    username: Username,
    email: Email,
    password_hash: PasswordHash,
    bio: String,
    image: Option<ImageUrl>,
    role: Role,
    favorites: BTreeSet<ItemId>,
    following: BTreeSet<UserId>,
    created_at: DateTime<Utc>,
}

impl User {
    /// Build a new [`User`] from validated components.
    ///
    /// New accounts start with an empty bio, no avatar, the ordinary role,
    /// and empty favorite and follow sets.
    #[must_use]
    pub fn new(
        id: UserId,
        username: Username,
        email: Email,
        password_hash: PasswordHash,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username,
            email,
            password_hash,
            bio: String::new(),
            image: None,
            role: Role::User,
            favorites: BTreeSet::new(),
            following: BTreeSet::new(),
            created_at,
        }
    }

    /// Replace the account role. Used when seeding operator accounts.
    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Stable user identifier.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Public handle shown to other users.
    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Login identifier.
    #[must_use]
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Stored password hash in PHC string format.
    #[must_use]
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Free-form profile text.
    #[must_use]
    pub fn bio(&self) -> &str {
        self.bio.as_str()
    }

    /// Avatar address, if one has been set.
    #[must_use]
    pub fn image(&self) -> Option<&ImageUrl> {
        self.image.as_ref()
    }

    /// Capability level of the account.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Identifiers of the listings this user has favorited.
    #[must_use]
    pub fn favorites(&self) -> &BTreeSet<ItemId> {
        &self.favorites
    }

    /// Identifiers of the users this user follows.
    #[must_use]
    pub fn following(&self) -> &BTreeSet<UserId> {
        &self.following
    }

    /// Moment the account was registered.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Apply a profile update, leaving omitted fields untouched.
    pub fn apply(&mut self, update: UserUpdate) {
        let UserUpdate {
            username,
            email,
            password_hash,
            bio,
            image,
        } = update;
        if let Some(username) = username {
            self.username = username;
        }
        if let Some(email) = email {
            self.email = email;
        }
        if let Some(password_hash) = password_hash {
            self.password_hash = password_hash;
        }
        if let Some(bio) = bio {
            self.bio = bio;
        }
        if let Some(image) = image {
            self.image = Some(image);
        }
    }

    /// Record a favorite. Returns `true` when the set changed.
    pub fn insert_favorite(&mut self, item: ItemId) -> bool {
        self.favorites.insert(item)
    }

    /// Remove a favorite. Returns `true` when the set changed.
    pub fn remove_favorite(&mut self, item: ItemId) -> bool {
        self.favorites.remove(&item)
    }

    /// Whether this user has favorited the given listing.
    #[must_use]
    pub fn has_favorited(&self, item: ItemId) -> bool {
        self.favorites.contains(&item)
    }

    /// Record a follow edge. Returns `true` when the set changed.
    pub fn insert_following(&mut self, target: UserId) -> bool {
        self.following.insert(target)
    }

    /// Remove a follow edge. Returns `true` when the set changed.
    pub fn remove_following(&mut self, target: UserId) -> bool {
        self.following.remove(&target)
    }

    /// Whether this user follows the given user.
    #[must_use]
    pub fn is_following(&self, target: UserId) -> bool {
        self.following.contains(&target)
    }

    /// Drop favorites pointing outside `keep`, returning how many were
    /// removed. Used by the compaction sweep.
    pub fn retain_favorites(&mut self, keep: &BTreeSet<ItemId>) -> u64 {
        let before = self.favorites.len();
        self.favorites.retain(|id| keep.contains(id));
        (before - self.favorites.len()) as u64
    }
}

/// Partial profile update; `None` fields retain their prior value.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub username: Option<Username>,
    pub email: Option<Email>,
    pub password_hash: Option<PasswordHash>,
    pub bio: Option<String>,
    pub image: Option<ImageUrl>,
}
